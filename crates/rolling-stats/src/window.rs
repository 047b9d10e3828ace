use statrs::statistics::Statistics;

pub use monitor_core::default_min_periods as min_periods;

/// Trailing `window` values ending at the last point.
pub fn trailing(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

/// Mean of the trailing window, or `None` with fewer than `min_periods` points in it.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Option<f64> {
    let tail = trailing(values, window);
    if tail.is_empty() || tail.len() < min_periods {
        return None;
    }
    Some(tail.mean()).filter(|v| v.is_finite())
}

/// Population (ddof = 0) standard deviation of the trailing window.
pub fn rolling_std(values: &[f64], window: usize, min_periods: usize) -> Option<f64> {
    let tail = trailing(values, window);
    if tail.is_empty() || tail.len() < min_periods {
        return None;
    }
    Some(tail.population_std_dev()).filter(|v| v.is_finite())
}

/// Population std at every position over a window that may contain gaps.
///
/// A position is defined once its window holds at least `min_periods` present values.
pub fn rolling_std_series(
    values: &[Option<f64>],
    window: usize,
    min_periods: usize,
) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if present.is_empty() || present.len() < min_periods {
                None
            } else {
                Some(present.as_slice().population_std_dev()).filter(|v| v.is_finite())
            }
        })
        .collect()
}
