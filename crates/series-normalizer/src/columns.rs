use crate::table::{Cell, Frame};
use monitor_core::first_available;
use statrs::statistics::Statistics;

fn name_hint_match(frame: &Frame, hints: &[String], exclude: Option<usize>) -> Option<usize> {
    hints.iter().find_map(|hint| {
        let hint = hint.to_lowercase();
        frame
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != exclude)
            .find(|(_, name)| name.to_lowercase().contains(&hint))
            .map(|(idx, _)| idx)
    })
}

fn typed_date_column(frame: &Frame) -> Option<usize> {
    (0..frame.columns.len()).find(|&idx| {
        let mut filled = frame.column(idx).filter(|c| !c.is_empty()).peekable();
        filled.peek().is_some() && filled.all(|c| matches!(c, Cell::Date(_)))
    })
}

fn best_parse_ratio(frame: &Frame, floor: f64) -> Option<usize> {
    if frame.rows.is_empty() {
        return None;
    }
    let total = frame.rows.len() as f64;
    let mut best: Option<(usize, f64)> = None;

    for idx in 0..frame.columns.len() {
        let parsed = frame.column(idx).filter(|c| c.as_date().is_some()).count();
        let ratio = parsed as f64 / total;
        if ratio >= floor && best.map_or(true, |(_, r)| ratio > r) {
            best = Some((idx, ratio));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Pick the date column: name hint, then typed date cells, then the best parse ratio
/// at or above `ratio_floor`.
pub fn select_date_column(frame: &Frame, hints: &[String], ratio_floor: f64) -> Option<usize> {
    first_available(&[
        &|| name_hint_match(frame, hints, None),
        &|| typed_date_column(frame),
        &|| best_parse_ratio(frame, ratio_floor),
    ])
}

struct Candidate {
    idx: usize,
    valid: usize,
    missing_ratio: f64,
    variance: f64,
}

fn numeric_candidates(frame: &Frame, exclude: Option<usize>) -> Vec<Candidate> {
    let total = frame.rows.len().max(1) as f64;
    (0..frame.columns.len())
        .filter(|idx| Some(*idx) != exclude)
        .filter_map(|idx| {
            let values: Vec<f64> = frame.column(idx).filter_map(Cell::as_number).collect();
            if values.is_empty() {
                return None;
            }
            let variance = values.as_slice().population_variance();
            Some(Candidate {
                idx,
                valid: values.len(),
                missing_ratio: (frame.rows.len() - values.len()) as f64 / total,
                variance,
            })
        })
        .filter(|c| c.variance.is_finite() && c.variance > 0.0)
        .collect()
}

fn best_ranked(mut candidates: Vec<Candidate>) -> Option<usize> {
    candidates.sort_by(|a, b| {
        a.missing_ratio
            .total_cmp(&b.missing_ratio)
            .then(b.variance.total_cmp(&a.variance))
    });
    candidates.first().map(|c| c.idx)
}

/// Pick the value column: name hint, then the fullest high-variance column with at least
/// `min_periods` numbers, then the same ranking without the sample floor.
pub fn select_value_column(
    frame: &Frame,
    hints: &[String],
    exclude: Option<usize>,
    min_periods: usize,
) -> Option<usize> {
    first_available(&[
        &|| name_hint_match(frame, hints, exclude),
        &|| {
            best_ranked(
                numeric_candidates(frame, exclude)
                    .into_iter()
                    .filter(|c| c.valid >= min_periods)
                    .collect(),
            )
        },
        &|| best_ranked(numeric_candidates(frame, exclude)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn frame(csv: &str) -> Frame {
        Table::from_csv_reader(csv.as_bytes()).unwrap().with_header(0)
    }

    fn hints(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_date_hint_wins_over_position() {
        let f = frame("id,Trade Date,px\n1,2025-01-02,3\n2,2025-01-03,4\n");
        assert_eq!(select_date_column(&f, &hints(&["date"]), 0.7), Some(1));
    }

    #[test]
    fn test_date_by_typed_cells() {
        let f = frame("a,b\n1,2025-01-02\n2,2025-01-03\n");
        assert_eq!(select_date_column(&f, &hints(&["date"]), 0.7), Some(1));
    }

    #[test]
    fn test_date_by_parse_ratio_respects_floor() {
        let f = frame("a,b\n1,2025/01/02\n2,2025/01/03\n3,junk\n4,2025/01/06\n");
        // 3 of 4 parse
        assert_eq!(select_date_column(&f, &hints(&["date"]), 0.7), Some(1));
        assert_eq!(select_date_column(&f, &hints(&["date"]), 0.8), None);
    }

    #[test]
    fn test_value_hint_skips_excluded_column() {
        let f = frame("close date,close\n2025-01-02,3\n");
        assert_eq!(select_value_column(&f, &hints(&["close"]), Some(0), 1), Some(1));
    }

    #[test]
    fn test_value_ranking_prefers_fewer_missing_then_variance() {
        let f = frame("a,b,c,d\n1,10,5,7\n2,20,,7\n3,30,6,7\n");
        // d has zero variance, c has a gap, b has larger variance than a
        assert_eq!(select_value_column(&f, &[], None, 1), Some(1));
    }

    #[test]
    fn test_value_fallback_ignores_sample_floor() {
        let f = frame("a,b\nx,1\ny,2\n");
        assert_eq!(select_value_column(&f, &[], None, 30), Some(1));
    }

    #[test]
    fn test_value_none_when_only_flat_columns() {
        let f = frame("a,b\n1,x\n1,y\n");
        assert_eq!(select_value_column(&f, &[], None, 1), None);
    }
}
