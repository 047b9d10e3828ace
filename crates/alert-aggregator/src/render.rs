use crate::summary::{AlertSummary, Hit};

pub const TITLE: &str = "[Risk threshold breach alert]";
pub const NO_BREACH_LINE: &str = "No indicators exceeded their thresholds today.";
pub const FOOTER_LINE: &str = "See the internal dashboard for details.";

/// Plain-text alert: header, one block per breached row, footer with the dashboard link.
pub fn render_message(summary: &AlertSummary, dashboard_url: &str) -> String {
    let mut lines = vec![
        TITLE.to_string(),
        format!("as of {}", summary.date.format("%Y-%m-%d")),
        String::new(),
    ];

    if summary.is_empty() {
        lines.push(NO_BREACH_LINE.to_string());
    }

    for entry in &summary.entries {
        let mut head = format!("• {}", entry.metric);
        if let Some(ticker) = &entry.ticker {
            head.push_str(&format!(" ({})", ticker));
        }
        lines.push(head);

        for hit in &entry.hits {
            let line = match hit {
                Hit::OneDay { change, threshold } => format!(
                    "   - 1-day change: {} (threshold {})",
                    change.as_deref().unwrap_or(""),
                    threshold.as_deref().unwrap_or("")
                ),
                Hit::TenDay { change, threshold } => format!(
                    "   - 10-day change: {} (threshold {})",
                    change.as_deref().unwrap_or(""),
                    threshold.as_deref().unwrap_or("")
                ),
                Hit::Average { note: Some(note) } => {
                    format!("   - 3-month/average threshold exceeded: {}", note)
                }
                Hit::Average { note: None } => "   - 3-month/average threshold exceeded".to_string(),
                Hit::Other { column } => format!("   - {} exceeded", column),
            };
            lines.push(line);
        }

        if let Some(latest) = &entry.latest {
            lines.push(format!("   - Current level: {}", latest));
        }
        lines.push(String::new());
    }

    lines.push(String::new());
    lines.push(FOOTER_LINE.to_string());
    lines.push(dashboard_url.to_string());
    lines.join("\n")
}
