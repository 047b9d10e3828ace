use chrono::{Datelike, Months};
use monitor_core::TimeSeries;
use statrs::statistics::Statistics;

/// Business days in roughly three months.
pub const THREE_MONTH_DAYS: usize = 63;

/// Mean of the last `min(63, len)` points; `None` below 10 points.
pub fn trailing_3m_avg(values: &[f64]) -> Option<f64> {
    if values.len() < 10 {
        return None;
    }
    let window = THREE_MONTH_DAYS.min(values.len());
    Some(values[values.len() - window..].mean())
}

/// Mean of the calendar month `months_ago` months before the latest point's month.
///
/// `0` is the current month. `None` for undated series or an empty month.
pub fn month_avg(series: &TimeSeries, months_ago: u32) -> Option<f64> {
    let last = series.last_stamp()?.date()?;
    let target = last.checked_sub_months(Months::new(months_ago))?;

    let in_month: Vec<f64> = series
        .dated_points()
        .filter(|(d, _)| d.year() == target.year() && d.month() == target.month())
        .map(|(_, v)| v)
        .collect();

    if in_month.is_empty() {
        None
    } else {
        Some(in_month.as_slice().mean())
    }
}
