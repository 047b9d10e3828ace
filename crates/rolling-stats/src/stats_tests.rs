#[cfg(test)]
mod tests {
    use super::super::calendar::*;
    use super::super::change::*;
    use super::super::window::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use monitor_core::TimeSeries;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_rolling_mean_requires_min_periods() {
        let values: Vec<f64> = (1..=29).map(|x| x as f64).collect();
        assert!(rolling_mean(&values, 60, min_periods(60)).is_none());

        let values: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert_relative_eq!(rolling_mean(&values, 60, 30).unwrap(), 15.5);
    }

    #[test]
    fn test_rolling_window_uses_trailing_points() {
        let mut values = vec![1000.0; 10];
        values.extend(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(rolling_mean(&values, 8, 8).unwrap(), 5.0);
        // population std of the classic 2,4,4,4,5,5,7,9 sample
        assert_relative_eq!(rolling_std(&values, 8, 8).unwrap(), 2.0);
    }

    #[test]
    fn test_rolling_std_zero_for_flat_series() {
        let values = vec![3.0; 40];
        assert_relative_eq!(rolling_std(&values, 60, 30).unwrap(), 0.0);
    }

    #[test]
    fn test_rolling_std_series_handles_gaps() {
        let values = vec![None, Some(1.0), Some(3.0), None, Some(5.0)];
        let out = rolling_std_series(&values, 3, 2);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 1.0);
        assert_relative_eq!(out[3].unwrap(), 1.0);
        assert_relative_eq!(out[4].unwrap(), 1.0);
    }

    #[test]
    fn test_changes() {
        let values = vec![3.00, 3.10, 3.25];
        assert_relative_eq!(bp_change(&values, 1).unwrap(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(bp_change(&values, 2).unwrap(), 25.0, epsilon = 1e-9);
        assert!(bp_change(&values, 3).is_none());

        assert_relative_eq!(pp_change(&values, 2).unwrap(), 0.25, epsilon = 1e-9);
        assert_relative_eq!(pct_change(&[100.0, 96.0], 1).unwrap(), -4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pct_change_zero_reference() {
        assert!(pct_change(&[0.0, 1.0], 1).is_none());
    }

    #[test]
    fn test_consec_last_n() {
        assert!(consec_last_n(&[true, true, true, true, true], 5));
        assert!(!consec_last_n(&[true, true, false, true, true], 5));
        assert!(!consec_last_n(&[true, true, true, false, true], 3));
        assert!(consec_last_n(&[false, true, true, true], 3));
        assert!(!consec_last_n(&[true, true], 3));
    }

    #[test]
    fn test_has_data() {
        assert!(!has_data(&[1.0, 2.0, 3.0, 4.0], 5));
        assert!(has_data(&[1.0, 2.0, 3.0, 4.0, 5.0], 5));
    }

    #[test]
    fn test_trailing_3m_avg() {
        let short: Vec<f64> = (0..9).map(|x| x as f64).collect();
        assert!(trailing_3m_avg(&short).is_none());

        let ten: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_relative_eq!(trailing_3m_avg(&ten).unwrap(), 5.5);

        let mut long = vec![100.0; 37];
        long.extend(vec![1.0; 63]);
        assert_relative_eq!(trailing_3m_avg(&long).unwrap(), 1.0);
    }

    #[test]
    fn test_month_avg_by_calendar_month() {
        let s = TimeSeries::from_dated(
            "cds",
            vec![
                (d(2025, 1, 15), 10.0),
                (d(2025, 2, 3), 20.0),
                (d(2025, 2, 27), 40.0),
                (d(2025, 3, 31), 50.0),
                (d(2025, 4, 1), 60.0),
                (d(2025, 4, 2), 70.0),
            ],
        );
        assert_relative_eq!(month_avg(&s, 0).unwrap(), 65.0);
        assert_relative_eq!(month_avg(&s, 1).unwrap(), 50.0);
        assert_relative_eq!(month_avg(&s, 2).unwrap(), 30.0);
        assert_relative_eq!(month_avg(&s, 3).unwrap(), 10.0);
        assert!(month_avg(&s, 4).is_none());
    }

    #[test]
    fn test_month_avg_undated_series() {
        let s = TimeSeries::from_sequence("x", vec![Some(1.0), Some(2.0)]);
        assert!(month_avg(&s, 0).is_none());
    }
}
