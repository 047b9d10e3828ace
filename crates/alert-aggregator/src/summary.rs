use crate::table::BreachTable;
use chrono::NaiveDate;
use serde::Serialize;

/// One breached horizon of a selected row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Hit {
    OneDay {
        change: Option<String>,
        threshold: Option<String>,
    },
    TenDay {
        change: Option<String>,
        threshold: Option<String>,
    },
    Average {
        note: Option<String>,
    },
    /// Any other `breach*` column.
    Other {
        column: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEntry {
    pub metric: String,
    pub ticker: Option<String>,
    pub latest: Option<String>,
    pub hits: Vec<Hit>,
}

/// Rows with at least one explicitly true breach column, for one evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub date: NaiveDate,
    pub entries: Vec<AlertEntry>,
}

impl AlertSummary {
    pub fn select(table: &BreachTable, date: NaiveDate) -> Self {
        let text = |row: usize, col: &str| table.cell(row, col).map(|s| s.to_string());

        let entries: Vec<AlertEntry> = (0..table.len())
            .filter_map(|row| {
                let breached = table.breached_in(row);
                if breached.is_empty() {
                    return None;
                }
                let hits = breached
                    .into_iter()
                    .map(|col| match col {
                        "breach_1d" => Hit::OneDay {
                            change: text(row, "chg_1d"),
                            threshold: text(row, "threshold_1d"),
                        },
                        "breach_10d" => Hit::TenDay {
                            change: text(row, "chg_10d"),
                            threshold: text(row, "threshold_10d"),
                        },
                        "breach_3m" => Hit::Average {
                            note: text(row, "note"),
                        },
                        other => Hit::Other {
                            column: other.to_string(),
                        },
                    })
                    .collect();

                Some(AlertEntry {
                    metric: text(row, "metric").unwrap_or_default(),
                    ticker: text(row, "ticker"),
                    latest: text(row, "latest"),
                    hits,
                })
            })
            .collect();

        tracing::info!(
            "{} of {} rows breached for {}",
            entries.len(),
            table.len(),
            date
        );
        Self { date, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
