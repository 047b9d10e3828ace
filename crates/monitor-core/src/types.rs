use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Position of an observation: a calendar date, or the source row when no date column exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stamp {
    Date(NaiveDate),
    Seq(usize),
}

impl Stamp {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Stamp::Date(d) => Some(*d),
            Stamp::Seq(_) => None,
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Stamp::Seq(i) => write!(f, "{}", i),
        }
    }
}

/// Numeric time series with unique, ascending stamps and no missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    name: String,
    stamps: Vec<Stamp>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a dated series. Non-finite values are dropped, points are sorted by date and
    /// duplicate dates collapse to their arithmetic mean.
    pub fn from_dated(
        name: impl Into<String>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        Self::from_points(name, points.into_iter().map(|(d, v)| (Stamp::Date(d), v)))
    }

    /// Build from arbitrary stamped points with the same cleaning as `from_dated`.
    pub fn from_points(
        name: impl Into<String>,
        points: impl IntoIterator<Item = (Stamp, f64)>,
    ) -> Self {
        let mut buckets: BTreeMap<Stamp, (f64, usize)> = BTreeMap::new();
        for (stamp, value) in points {
            if !value.is_finite() {
                continue;
            }
            let entry = buckets.entry(stamp).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }

        let (stamps, values) = buckets
            .into_iter()
            .map(|(stamp, (sum, count))| (stamp, sum / count as f64))
            .unzip();

        Self {
            name: name.into(),
            stamps,
            values,
        }
    }

    /// Build a series indexed by row order; missing rows keep their position.
    pub fn from_sequence(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let (stamps, values) = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (Stamp::Seq(i), x)))
            .unzip();

        Self {
            name: name.into(),
            stamps,
            values,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stamps: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn last_stamp(&self) -> Option<Stamp> {
        self.stamps.last().copied()
    }

    pub fn is_dated(&self) -> bool {
        matches!(self.stamps.first(), Some(Stamp::Date(_)))
    }

    pub fn points(&self) -> impl Iterator<Item = (Stamp, f64)> + '_ {
        self.stamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Points that carry a calendar date.
    pub fn dated_points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points().filter_map(|(s, v)| s.date().map(|d| (d, v)))
    }

    /// Apply `f` pointwise; non-finite results are dropped.
    pub fn map(&self, name: impl Into<String>, f: impl Fn(f64) -> f64) -> Self {
        let (stamps, values) = self
            .points()
            .map(|(s, v)| (s, f(v)))
            .filter(|(_, v)| v.is_finite())
            .unzip();

        Self {
            name: name.into(),
            stamps,
            values,
        }
    }

    /// Value pairs on the stamps both series share (inner join), ascending.
    pub fn align(&self, other: &TimeSeries) -> Vec<(Stamp, f64, f64)> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.stamps.len() && j < other.stamps.len() {
            match self.stamps[i].cmp(&other.stamps[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push((self.stamps[i], self.values[i], other.values[j]));
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }

    /// Combine two series on their shared stamps; non-finite results are dropped.
    pub fn combine(
        &self,
        other: &TimeSeries,
        name: impl Into<String>,
        f: impl Fn(f64, f64) -> f64,
    ) -> Self {
        let (stamps, values) = self
            .align(other)
            .into_iter()
            .map(|(s, a, b)| (s, f(a, b)))
            .filter(|(_, v)| v.is_finite())
            .unzip();

        Self {
            name: name.into(),
            stamps,
            values,
        }
    }
}

/// Which side of a ladder is dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Fixed yellow/orange/red ladder registered for one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomThreshold {
    #[serde(default)]
    pub direction: Direction,
    pub yellow: f64,
    pub orange: f64,
    pub red: f64,
}

/// Severity of the latest value against its ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Normal,
    Yellow,
    Orange,
    Red,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Normal => "normal",
            Level::Yellow => "yellow",
            Level::Orange => "orange",
            Level::Red => "red",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Level::Normal),
            "yellow" => Ok(Level::Yellow),
            "orange" => Ok(Level::Orange),
            "red" => Ok(Level::Red),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

/// Two-state flag written to the indicator sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    G,
    Y,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::G => "G",
            Flag::Y => "Y",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapses a severity level into the binary flag.
///
/// `alert_from` is the least severe level that raises `Y`. `Normal` never raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagPolicy {
    pub alert_from: Level,
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self {
            alert_from: Level::Yellow,
        }
    }
}

impl FlagPolicy {
    pub fn collapse(&self, level: Level) -> Flag {
        if level != Level::Normal && level >= self.alert_from {
            Flag::Y
        } else {
            Flag::G
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    TooShort,
    NanOrZeroStd,
    CustomThreshold,
    AutoThreshold,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::TooShort => "too_short",
            ReasonCode::NanOrZeroStd => "nan_or_zero_std",
            ReasonCode::CustomThreshold => "custom_threshold",
            ReasonCode::AutoThreshold => "auto_threshold",
        }
    }
}

/// Evaluation of one indicator at its latest point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub indicator_id: Option<String>,
    pub len: usize,
    pub last: Option<f64>,
    pub mu: Option<f64>,
    pub sd: Option<f64>,
    /// Informational only; never drives the flag.
    pub zscore: Option<f64>,
    /// `mu ± k·sd` band, informational.
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    pub thr_yellow: Option<f64>,
    pub thr_orange: Option<f64>,
    pub thr_red: Option<f64>,
    pub direction: Option<Direction>,
    /// `None` when the series could not be judged.
    pub level: Option<Level>,
    pub flag: Flag,
    pub reason: ReasonCode,
}

impl ThresholdResult {
    /// Result for a series that could not be judged. Always `G`.
    pub fn unjudged(
        indicator_id: Option<String>,
        len: usize,
        last: Option<f64>,
        mu: Option<f64>,
        sd: Option<f64>,
        reason: ReasonCode,
    ) -> Self {
        Self {
            indicator_id,
            len,
            last,
            mu,
            sd,
            zscore: None,
            upper: None,
            lower: None,
            thr_yellow: None,
            thr_orange: None,
            thr_red: None,
            direction: None,
            level: None,
            flag: Flag::G,
            reason,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.level.is_some()
    }

    pub fn level_label(&self) -> &'static str {
        self.level.map(|l| l.as_str()).unwrap_or("n/a")
    }
}

/// The three designated cells per indicator sheet: flag, rolling mean, rolling std.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSlots {
    pub flag: Flag,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl From<&ThresholdResult> for OutputSlots {
    fn from(result: &ThresholdResult) -> Self {
        Self {
            flag: result.flag,
            mean: result.mu.filter(|v| v.is_finite()),
            std: result.sd.filter(|v| v.is_finite()),
        }
    }
}

impl OutputSlots {
    /// Cell texts in slot order; missing numbers are left blank.
    pub fn cells(&self) -> [String; 3] {
        let num = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        [self.flag.to_string(), num(self.mean), num(self.std)]
    }
}

/// One evaluated row of the breach catalog.
///
/// `None` in a `breach_*` field means "no verdict", which is distinct from `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreachRow {
    pub metric: String,
    pub ticker: String,
    pub latest: Option<f64>,
    pub chg_1d: Option<String>,
    pub threshold_1d: Option<String>,
    pub breach_1d: Option<bool>,
    pub chg_10d: Option<String>,
    pub threshold_10d: Option<String>,
    pub breach_10d: Option<bool>,
    pub breach_3m: Option<bool>,
    pub note: Option<String>,
}

impl BreachRow {
    /// Column order of the breach report.
    pub const COLUMNS: [&'static str; 11] = [
        "metric",
        "ticker",
        "latest",
        "chg_1d",
        "threshold_1d",
        "breach_1d",
        "chg_10d",
        "threshold_10d",
        "breach_10d",
        "breach_3m",
        "note",
    ];

    pub fn new(metric: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn with_latest(mut self, latest: Option<f64>) -> Self {
        self.latest = latest.filter(|v| v.is_finite());
        self
    }

    pub fn with_one_day(
        mut self,
        change: Option<String>,
        threshold: impl Into<String>,
        breach: Option<bool>,
    ) -> Self {
        self.chg_1d = change;
        self.threshold_1d = Some(threshold.into());
        self.breach_1d = breach;
        self
    }

    pub fn with_ten_day(
        mut self,
        change: Option<String>,
        threshold: impl Into<String>,
        breach: Option<bool>,
    ) -> Self {
        self.chg_10d = change;
        self.threshold_10d = Some(threshold.into());
        self.breach_10d = breach;
        self
    }

    pub fn with_three_month(mut self, breach: Option<bool>) -> Self {
        self.breach_3m = breach;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn breach_columns(&self) -> [(&'static str, Option<bool>); 3] {
        [
            ("breach_1d", self.breach_1d),
            ("breach_10d", self.breach_10d),
            ("breach_3m", self.breach_3m),
        ]
    }

    /// True only when some horizon explicitly breached.
    pub fn has_breach(&self) -> bool {
        self.breach_columns().iter().any(|(_, b)| *b == Some(true))
    }

    /// Cell texts in `COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let flag = |v: Option<bool>| match v {
            Some(true) => "TRUE".to_string(),
            Some(false) => "FALSE".to_string(),
            None => String::new(),
        };
        vec![
            self.metric.clone(),
            self.ticker.clone(),
            self.latest.map(|v| v.to_string()).unwrap_or_default(),
            text(&self.chg_1d),
            text(&self.threshold_1d),
            flag(self.breach_1d),
            text(&self.chg_10d),
            text(&self.threshold_10d),
            flag(self.breach_10d),
            flag(self.breach_3m),
            text(&self.note),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_from_dated_sorts_and_averages_duplicates() {
        let s = TimeSeries::from_dated(
            "x",
            vec![
                (d(2025, 1, 3), 3.0),
                (d(2025, 1, 1), 1.0),
                (d(2025, 1, 3), 5.0),
                (d(2025, 1, 2), f64::NAN),
            ],
        );

        assert_eq!(s.len(), 2);
        assert_eq!(s.stamps()[0], Stamp::Date(d(2025, 1, 1)));
        assert_relative_eq!(s.values()[1], 4.0);
        assert!(s.is_dated());
    }

    #[test]
    fn test_from_sequence_keeps_row_positions() {
        let s = TimeSeries::from_sequence("x", vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(s.stamps(), &[Stamp::Seq(0), Stamp::Seq(2)]);
        assert!(!s.is_dated());
    }

    #[test]
    fn test_combine_inner_joins_on_stamps() {
        let a = TimeSeries::from_dated("a", vec![(d(2025, 1, 1), 3.0), (d(2025, 1, 2), 3.5)]);
        let b = TimeSeries::from_dated("b", vec![(d(2025, 1, 2), 3.0), (d(2025, 1, 3), 3.1)]);
        let spread = a.combine(&b, "a-b", |x, y| (x - y) * 100.0);

        assert_eq!(spread.len(), 1);
        assert_relative_eq!(spread.values()[0], 50.0);
    }

    #[test]
    fn test_flag_policy_default_alerts_from_yellow() {
        let policy = FlagPolicy::default();
        assert_eq!(policy.collapse(Level::Normal), Flag::G);
        assert_eq!(policy.collapse(Level::Yellow), Flag::Y);
        assert_eq!(policy.collapse(Level::Red), Flag::Y);
    }

    #[test]
    fn test_flag_policy_orange_ignores_yellow() {
        let policy = FlagPolicy {
            alert_from: Level::Orange,
        };
        assert_eq!(policy.collapse(Level::Yellow), Flag::G);
        assert_eq!(policy.collapse(Level::Orange), Flag::Y);
    }

    #[test]
    fn test_breach_row_has_breach_requires_explicit_true() {
        let row = BreachRow::new("m", "t").with_one_day(None, "x", None);
        assert!(!row.has_breach());

        let row = row.with_ten_day(Some("1%".into()), "y", Some(true));
        assert!(row.has_breach());
        assert_eq!(row.cells()[5], "");
        assert_eq!(row.cells()[8], "TRUE");
    }

    #[test]
    fn test_output_slots_blank_for_missing_numbers() {
        let result = ThresholdResult::unjudged(None, 3, Some(1.0), None, None, ReasonCode::TooShort);
        let slots = OutputSlots::from(&result);
        assert_eq!(slots.cells(), ["G".to_string(), String::new(), String::new()]);
    }
}
