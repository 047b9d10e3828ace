#[cfg(test)]
mod breach_rules_tests {
    use crate::panel::ResolvedSeries;
    use crate::rules::BreachRegistry;
    use crate::shapes::MISSING_NOTE;
    use crate::thresholds::BreachThresholds;
    use crate::InstrumentCatalog;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};
    use monitor_core::{BreachRow, TimeSeries};

    /// Daily points from 2025-01-01 onward (Jan 1 .. Feb 28 for 59 values).
    fn daily(key: &str, values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        TimeSeries::from_dated(
            key,
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Days::new(i as u64), *v)),
        )
    }

    fn data(series: Vec<(&str, Vec<f64>)>) -> ResolvedSeries {
        series
            .into_iter()
            .map(|(k, v)| (k.to_string(), daily(k, &v)))
            .collect()
    }

    fn find<'a>(rows: &'a [BreachRow], metric: &str) -> &'a BreachRow {
        rows.iter()
            .find(|r| r.metric == metric)
            .unwrap_or_else(|| panic!("no row for {}", metric))
    }

    #[test]
    fn test_flat_term_spread_counts_as_inversion() {
        let rows = BreachRegistry::default().evaluate(&data(vec![
            ("KR10Y", vec![3.0; 30]),
            ("KR3Y", vec![3.0; 30]),
        ]));

        let inversion = find(&rows, "KR Term Spread 10Y-3Y (5D inversion)");
        assert_eq!(inversion.breach_1d, Some(true));
        assert_relative_eq!(inversion.latest.unwrap(), 0.0);
        assert_eq!(inversion.ticker, "SKTB10YY Index - SKTB3YAY Index");
        assert_eq!(inversion.threshold_1d.as_deref(), Some("≤ 0bp for 5D"));

        let kr3y = find(&rows, "KR 3Y KTB Yield");
        assert_eq!(kr3y.breach_1d, Some(false));
        assert_eq!(kr3y.breach_10d, Some(false));
        assert!(!kr3y.has_breach());

        // catalog order: single-series rates come first
        assert_eq!(rows[0].metric, "KR 3Y KTB Yield");
        assert_eq!(rows[1].metric, "KR 10Y KTB Yield");
    }

    #[test]
    fn test_missing_or_short_inputs_emit_no_rows() {
        let registry = BreachRegistry::default();
        assert!(registry.evaluate(&ResolvedSeries::new()).is_empty());

        let rows = registry.evaluate(&data(vec![("KOSPI", vec![2500.0; 4])]));
        assert!(rows.is_empty());

        // a spread rule needs both legs
        let rows = registry.evaluate(&data(vec![("KRBASERATE", vec![3.0; 20])]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_kospi_declines_only() {
        let mut values = vec![100.0; 20];
        values.push(96.0);
        let rows = BreachRegistry::default().evaluate(&data(vec![("KOSPI", values)]));

        let kospi = find(&rows, "KOSPI Index");
        assert_eq!(kospi.chg_1d.as_deref(), Some("-4.00%"));
        assert_eq!(kospi.threshold_1d.as_deref(), Some("≤ -3.5%"));
        assert_eq!(kospi.breach_1d, Some(true));
        assert_eq!(kospi.breach_10d, Some(false));

        let mut values = vec![100.0; 20];
        values.push(104.0);
        let rows = BreachRegistry::default().evaluate(&data(vec![("KOSPI", values)]));
        assert_eq!(find(&rows, "KOSPI Index").breach_1d, Some(false));
    }

    #[test]
    fn test_country_cds_month_over_month() {
        // 31 January points at 20, 28 February points at 30
        let mut values = vec![20.0; 31];
        values.extend(vec![30.0; 28]);
        let rows = BreachRegistry::default().evaluate(&data(vec![("Japan", values)]));

        let japan = find(&rows, "CDS 5Y: Japan (MTD vs PrevM)");
        assert_eq!(japan.chg_1d.as_deref(), Some("50.0%"));
        assert_eq!(japan.breach_1d, Some(true));
        assert_eq!(japan.note.as_deref(), Some("MTD=30.0, PrevM=20.0"));
        assert_relative_eq!(japan.latest.unwrap(), 30.0);
    }

    #[test]
    fn test_korea_cds_needs_baseline_month() {
        let mut values = vec![30.0; 31];
        values.extend(vec![30.0; 25]);
        values.extend(vec![140.0; 3]);
        let rows = BreachRegistry::default().evaluate(&data(vec![("Korea", values)]));

        let prev = find(&rows, "KR 5Y CDS vs PrevM (3D consec)");
        assert_eq!(prev.breach_1d, Some(true));
        assert_eq!(prev.note.as_deref(), Some("PrevM avg=30.0bp"));
        assert_relative_eq!(prev.latest.unwrap(), 140.0);

        // no data three months back
        assert!(rows.iter().all(|r| r.metric != "KR 5Y CDS vs M-3 (3D consec)"));
    }

    #[test]
    fn test_month_rule_without_previous_month_is_undefined() {
        let values: Vec<f64> = (0..10).map(|i| 0.3 + i as f64 * 0.01).collect();
        let rows = BreachRegistry::default().evaluate(&data(vec![("US_FRAOIS_3M", values)]));

        let fra = find(&rows, "USD 3M FRA-OIS (MTD - PrevM)");
        assert_eq!(fra.breach_1d, None);
        assert_eq!(fra.chg_1d, None);
        assert_eq!(fra.note.as_deref(), Some(MISSING_NOTE));
        assert!(!fra.has_breach());
    }

    #[test]
    fn test_base_minus_call_level() {
        let rows = BreachRegistry::default().evaluate(&data(vec![
            ("KRBASERATE", vec![3.0; 10]),
            ("KRCALL", vec![2.5; 10]),
        ]));
        let row = find(&rows, "KR Base - Call (level)");
        assert_relative_eq!(row.latest.unwrap(), 50.0, epsilon = 1e-9);
        assert_eq!(row.threshold_1d.as_deref(), Some("> +40bp"));
        assert_eq!(row.breach_1d, Some(true));
    }

    #[test]
    fn test_threshold_override_changes_verdict() {
        let mut values = vec![3.0; 10];
        values.push(3.01);
        let series = data(vec![("KR3Y", values)]);

        let default_rows = BreachRegistry::default().evaluate(&series);
        assert_eq!(find(&default_rows, "KR 3Y KTB Yield").breach_1d, Some(false));

        let tight = BreachThresholds {
            kr3y_1d_bp: 0.5,
            ..Default::default()
        };
        let rows = BreachRegistry::new(InstrumentCatalog::default(), tight).evaluate(&series);
        let row = find(&rows, "KR 3Y KTB Yield");
        assert_eq!(row.breach_1d, Some(true));
    }
}
