#[cfg(test)]
mod threshold_evaluator_tests {
    use crate::evaluator::ThresholdEvaluator;
    use crate::ladder::Ladder;
    use approx::assert_relative_eq;
    use monitor_core::{
        CustomThreshold, Direction, Flag, FlagPolicy, Level, MonitorConfig, ReasonCode, TimeSeries,
    };

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_sequence("IND", values.iter().map(|v| Some(*v)))
    }

    fn linear(n: usize, from: f64, to: f64) -> Vec<f64> {
        (0..n)
            .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
            .collect()
    }

    fn evaluator() -> ThresholdEvaluator {
        ThresholdEvaluator::new(MonitorConfig::default())
    }

    #[test]
    fn test_short_series_is_green() {
        let values: Vec<f64> = (0..29).map(|i| 1000.0 * i as f64).collect();
        let result = evaluator().evaluate(Some("IND001"), &series(&values));

        assert_eq!(result.flag, Flag::G);
        assert_eq!(result.reason, ReasonCode::TooShort);
        assert!(result.level.is_none());
        assert_eq!(result.len, 29);
    }

    #[test]
    fn test_zero_std_is_green() {
        let result = evaluator().evaluate(Some("IND001"), &series(&[5.0; 80]));

        assert_eq!(result.flag, Flag::G);
        assert_eq!(result.reason, ReasonCode::NanOrZeroStd);
        assert_relative_eq!(result.mu.unwrap(), 5.0);
        assert_relative_eq!(result.sd.unwrap(), 0.0);
        assert!(!result.is_evaluated());
    }

    #[test]
    fn test_linear_rise_triggers_yellow() {
        let result = evaluator().evaluate(Some("IND010"), &series(&linear(90, 100.0, 150.0)));

        assert_eq!(result.reason, ReasonCode::AutoThreshold);
        assert_eq!(result.level, Some(Level::Yellow));
        assert_eq!(result.flag, Flag::Y);
        assert_relative_eq!(result.thr_yellow.unwrap(), result.mu.unwrap() * 1.1, epsilon = 1e-9);
        assert!(result.zscore.unwrap() > 0.0);
    }

    #[test]
    fn test_custom_ladder_is_case_insensitive() {
        let mut values = linear(60, 1300.0, 1390.0);
        values.push(1650.0);
        let result = evaluator().evaluate(Some("ind071"), &series(&values));

        assert_eq!(result.reason, ReasonCode::CustomThreshold);
        assert_eq!(result.level, Some(Level::Orange));
        assert_eq!(result.thr_red, Some(1800.0));
        assert_eq!(result.flag, Flag::Y);
    }

    #[test]
    fn test_down_ladder_inverts_comparison() {
        let mut config = MonitorConfig::default();
        config.custom_thresholds.insert(
            "IND200".to_string(),
            CustomThreshold {
                direction: Direction::Down,
                yellow: 10.0,
                orange: 5.0,
                red: 0.0,
            },
        );
        let ev = ThresholdEvaluator::new(config);

        let mut values = linear(60, 20.0, 12.0);
        values.push(5.0);
        let result = ev.evaluate(Some("IND200"), &series(&values));
        // equality reaches the tier
        assert_eq!(result.level, Some(Level::Orange));

        let mut values = linear(60, 20.0, 12.0);
        values.push(11.0);
        assert_eq!(ev.evaluate(Some("IND200"), &series(&values)).flag, Flag::G);
    }

    #[test]
    fn test_severity_monotonic_in_last_value() {
        let ladder = Ladder::custom(&CustomThreshold {
            direction: Direction::Up,
            yellow: 1.0,
            orange: 2.0,
            red: 3.0,
        });
        let mut previous = Level::Normal;
        for step in 0..40 {
            let level = ladder.classify(step as f64 * 0.1);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(ladder.classify(3.0), Level::Red);
        assert_eq!(ladder.classify(0.99), Level::Normal);
    }

    #[test]
    fn test_collapse_invariant_default_policy() {
        let ev = evaluator();
        for end in [100.0, 120.0, 140.0, 150.0, 170.0, 200.0, 260.0] {
            let mut values = linear(70, 100.0, 110.0);
            values.push(end);
            let result = ev.evaluate(None, &series(&values));
            assert!(result.is_evaluated());
            assert_eq!(result.flag == Flag::G, result.level == Some(Level::Normal));
        }
    }

    #[test]
    fn test_orange_policy_keeps_yellow_green() {
        let mut config = MonitorConfig::default();
        config.flag_policy = FlagPolicy {
            alert_from: Level::Orange,
        };
        let result = ThresholdEvaluator::new(config)
            .evaluate(None, &series(&linear(90, 100.0, 150.0)));

        assert_eq!(result.level, Some(Level::Yellow));
        assert_eq!(result.flag, Flag::G);
    }

    #[test]
    fn test_band_uses_k() {
        let result = evaluator().evaluate(None, &series(&linear(90, 100.0, 150.0)));
        let (mu, sd) = (result.mu.unwrap(), result.sd.unwrap());
        assert_relative_eq!(result.upper.unwrap(), mu + 2.0 * sd, epsilon = 1e-9);
        assert_relative_eq!(result.lower.unwrap(), mu - 2.0 * sd, epsilon = 1e-9);
    }
}
