use crate::table::{Frame, Table};

const BAD_HEADER_NAMES: [&str; 4] = ["", "nan", "nat", "none"];

/// Number of columns whose first `lookahead` cells are at least half numeric.
pub fn numeric_score(frame: &Frame, lookahead: usize) -> usize {
    let head = frame.head(lookahead);
    if head.rows.is_empty() {
        return 0;
    }
    (0..head.columns.len())
        .filter(|&idx| {
            let total = head.rows.len();
            let numeric = head.column(idx).filter(|c| c.as_number().is_some()).count();
            numeric as f64 / total as f64 >= 0.5
        })
        .count()
}

fn likely_good(frame: &Frame, lookahead: usize) -> bool {
    numeric_score(frame, lookahead) >= 2
}

/// Locate the header row and return the frame below it.
///
/// Row 0 is kept when at least two columns look numeric underneath it. Otherwise each of
/// the first `max_scan` rows is scored as a candidate header: numeric columns minus half a
/// point per blank-looking name. The first best row wins.
pub fn detect_header(table: &Table, max_scan: usize, lookahead: usize) -> (usize, Frame) {
    let first = table.with_header(0);
    if likely_good(&first, lookahead) {
        return (0, first);
    }

    let candidates = max_scan.min(table.height());
    let mut best_row = 0;
    let mut best_score = f64::NEG_INFINITY;

    for row in 0..candidates {
        let frame = table.with_header(row);
        let penalty = frame
            .columns
            .iter()
            .filter(|name| BAD_HEADER_NAMES.contains(&name.to_lowercase().as_str()))
            .count();
        let score = numeric_score(&frame, lookahead) as f64 - 0.5 * penalty as f64;

        if score > best_score {
            best_score = score;
            best_row = row;
        }
    }

    tracing::debug!("Header detected at row {} (score {:.1})", best_row, best_score);
    (best_row, table.with_header(best_row))
}
