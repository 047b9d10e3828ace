//! The four rule shapes every catalog entry is built from.

use monitor_core::{BreachRow, TimeSeries};
use rolling_stats::{bp_change, consec_last_n, has_data, pct_change, pp_change, trailing_3m_avg};

/// Minimum points before any rule is evaluated.
pub const MIN_POINTS: usize = 5;

pub const MISSING_NOTE: &str = "check data/ticker";

/// Unit a change is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Basis points of a rate quoted in percent.
    Bp,
    Pct,
    /// Percentage points of a level quoted in percent.
    Pp,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Bp => "bp",
            Unit::Pct => "%",
            Unit::Pp => "pp",
        }
    }

    pub fn change(&self, values: &[f64], n: usize) -> Option<f64> {
        match self {
            Unit::Bp => bp_change(values, n),
            Unit::Pct => pct_change(values, n),
            Unit::Pp => pp_change(values, n),
        }
    }

    pub fn format(&self, v: f64) -> String {
        match self {
            Unit::Bp => format!("{:.1}bp", v),
            Unit::Pct => format!("{:.2}%", v),
            Unit::Pp => format!("{:.2}pp", v),
        }
    }
}

/// Comparison that turns a measured change into a verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    AbsAtLeast(f64),
    AbsAbove(f64),
    AtLeast(f64),
    Above(f64),
    AtMost(f64),
    Below(f64),
}

impl Trigger {
    pub fn test(&self, x: f64) -> bool {
        match *self {
            Trigger::AbsAtLeast(t) => x.abs() >= t,
            Trigger::AbsAbove(t) => x.abs() > t,
            Trigger::AtLeast(t) => x >= t,
            Trigger::Above(t) => x > t,
            Trigger::AtMost(t) => x <= t,
            Trigger::Below(t) => x < t,
        }
    }

    /// Human-readable threshold, e.g. `±15bp`, `≤ -3.5%`, `abs(Δ) > 75bp`.
    pub fn label(&self, suffix: &str, decimals: usize) -> String {
        let signed = |t: f64| {
            if t == 0.0 {
                format!("{:.*}", decimals, t)
            } else {
                format!("{:+.*}", decimals, t)
            }
        };
        match *self {
            Trigger::AbsAtLeast(t) => format!("±{:.*}{}", decimals, t, suffix),
            Trigger::AbsAbove(t) => format!("abs(Δ) > {:.*}{}", decimals, t, suffix),
            Trigger::AtLeast(t) => format!("≥ {}{}", signed(t), suffix),
            Trigger::Above(t) => format!("> {}{}", signed(t), suffix),
            Trigger::AtMost(t) => format!("≤ {}{}", signed(t), suffix),
            Trigger::Below(t) => format!("< {}{}", signed(t), suffix),
        }
    }
}

/// One horizon of a dual-horizon rule.
#[derive(Debug, Clone, Copy)]
pub struct Horizon {
    pub trigger: Trigger,
    pub decimals: usize,
}

impl Horizon {
    pub fn new(trigger: Trigger, decimals: usize) -> Self {
        Self { trigger, decimals }
    }
}

/// 1-day and 10-day change of a single series, each judged by its own trigger.
pub fn dual_horizon(
    metric: &str,
    ticker: &str,
    series: &TimeSeries,
    unit: Unit,
    one_day: Horizon,
    ten_day: Horizon,
    note: &str,
) -> Option<BreachRow> {
    let values = series.values();
    if !has_data(values, MIN_POINTS) {
        return None;
    }

    let c1 = unit.change(values, 1);
    let c10 = unit.change(values, 10);

    Some(
        BreachRow::new(metric, ticker)
            .with_latest(series.last())
            .with_one_day(
                c1.map(|v| unit.format(v)),
                one_day.trigger.label(unit.suffix(), one_day.decimals),
                c1.map(|v| one_day.trigger.test(v)),
            )
            .with_ten_day(
                c10.map(|v| unit.format(v)),
                ten_day.trigger.label(unit.suffix(), ten_day.decimals),
                c10.map(|v| ten_day.trigger.test(v)),
            )
            .with_note(note),
    )
}

/// Latest value against its trailing three-month mean, in basis points.
pub fn baseline_deviation(
    metric: &str,
    ticker: &str,
    series: &TimeSeries,
    limit_bp: f64,
) -> Option<BreachRow> {
    let values = series.values();
    if !has_data(values, MIN_POINTS) {
        return None;
    }

    let last = series.last();
    let avg = trailing_3m_avg(values);
    let row = BreachRow::new(metric, ticker).with_latest(last);

    Some(match (last, avg) {
        (Some(last), Some(avg)) => {
            let dev_bp = (last - avg) * 100.0;
            row.with_three_month(Some(dev_bp.abs() >= limit_bp)).with_note(format!(
                "3M avg={:.4}, dev={:.1}bp; limit ±{}bp",
                avg, dev_bp, limit_bp
            ))
        }
        _ => row.with_note("insufficient data"),
    })
}

/// Daily spread `(a - b) × 100` in basis points on the dates both series share.
pub fn spread_bp(a: &TimeSeries, b: &TimeSeries, name: &str) -> TimeSeries {
    a.combine(b, name, |x, y| (x - y) * 100.0)
}

/// Level rule on a daily spread: breached when the trigger held on each of the last `days`
/// observations (`days == 1` judges the latest value alone).
pub fn spread_level(
    metric: &str,
    ticker: &str,
    spread: &TimeSeries,
    trigger: Trigger,
    days: usize,
    note: &str,
) -> BreachRow {
    let flags: Vec<bool> = spread.values().iter().map(|v| trigger.test(*v)).collect();
    let breach = if spread.is_empty() {
        None
    } else {
        Some(consec_last_n(&flags, days))
    };

    let mut label = trigger.label("bp", 0);
    if days > 1 {
        label = format!("{} for {}D", label, days);
    }

    BreachRow::new(metric, ticker)
        .with_latest(spread.last())
        .with_one_day(None, label, breach)
        .with_note(note)
}

/// Month-average comparison. `value` is `None` when either month is missing, which leaves
/// the verdict undefined and notes that the inputs need checking.
pub fn monthly_change(
    metric: &str,
    ticker: &str,
    value: Option<f64>,
    shown: impl Fn(f64) -> String,
    trigger: Trigger,
    threshold: String,
    detail: impl FnOnce() -> String,
) -> BreachRow {
    let row = BreachRow::new(metric, ticker).with_one_day(
        value.map(&shown),
        threshold,
        value.map(|v| trigger.test(v)),
    );
    match value {
        Some(_) => row.with_note(detail()),
        None => row.with_note(MISSING_NOTE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn daily(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        TimeSeries::from_dated(
            "s",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Days::new(i as u64), *v)),
        )
    }

    #[test]
    fn test_trigger_labels() {
        assert_eq!(Trigger::AbsAtLeast(15.0).label("bp", 0), "±15bp");
        assert_eq!(Trigger::AtMost(-3.5).label("%", 1), "≤ -3.5%");
        assert_eq!(Trigger::AtLeast(5.0).label("pp", 1), "≥ +5.0pp");
        assert_eq!(Trigger::AbsAbove(75.0).label("bp", 0), "abs(Δ) > 75bp");
    }

    #[test]
    fn test_dual_horizon_short_series_emits_nothing() {
        let s = daily(&[1.0, 2.0, 3.0, 4.0]);
        let h = Horizon::new(Trigger::AbsAtLeast(1.0), 0);
        assert!(dual_horizon("m", "t", &s, Unit::Bp, h, h, "").is_none());
    }

    #[test]
    fn test_dual_horizon_ten_day_undefined_below_eleven_points() {
        let s = daily(&[3.00, 3.01, 3.02, 3.03, 3.20]);
        let row = dual_horizon(
            "KR",
            "T",
            &s,
            Unit::Bp,
            Horizon::new(Trigger::AbsAtLeast(15.0), 0),
            Horizon::new(Trigger::AbsAtLeast(50.0), 0),
            "note",
        )
        .unwrap();
        assert_eq!(row.chg_1d.as_deref(), Some("17.0bp"));
        assert_eq!(row.breach_1d, Some(true));
        assert_eq!(row.chg_10d, None);
        assert_eq!(row.breach_10d, None);
        assert_eq!(row.threshold_10d.as_deref(), Some("±50bp"));
    }

    #[test]
    fn test_baseline_deviation_needs_ten_points() {
        let short = daily(&[4.0; 6]);
        let row = baseline_deviation("US", "T", &short, 100.0).unwrap();
        assert_eq!(row.breach_3m, None);
        assert_eq!(row.note.as_deref(), Some("insufficient data"));

        let mut values = vec![4.0; 20];
        values.push(5.5);
        let row = baseline_deviation("US", "T", &daily(&values), 100.0).unwrap();
        assert_eq!(row.breach_3m, Some(true));
    }

    #[test]
    fn test_spread_level_consecutive_days() {
        let spread = daily(&[10.0, -30.0, -30.0, -30.0, -30.0, -30.0]);
        let row = spread_level("m", "t", &spread, Trigger::Below(-24.0), 5, "");
        assert_eq!(row.breach_1d, Some(true));
        assert_eq!(row.threshold_1d.as_deref(), Some("< -24bp for 5D"));

        let row = spread_level("m", "t", &spread, Trigger::Below(-24.0), 6, "");
        assert_eq!(row.breach_1d, Some(false));

        let empty = TimeSeries::empty("e");
        let row = spread_level("m", "t", &empty, Trigger::Above(40.0), 1, "");
        assert_eq!(row.breach_1d, None);
    }

    #[test]
    fn test_monthly_change_undefined_value() {
        let row = monthly_change(
            "m",
            "t",
            None,
            |v| format!("{:.1}bp", v),
            Trigger::Above(30.0),
            "> +30bp".to_string(),
            String::new,
        );
        assert_eq!(row.breach_1d, None);
        assert_eq!(row.note.as_deref(), Some(MISSING_NOTE));
    }
}
