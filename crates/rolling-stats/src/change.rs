//! Point-to-point changes and simple guards over a value slice.

pub fn last_value(values: &[f64]) -> Option<f64> {
    values.last().copied()
}

/// Enough points for a rule to be evaluated at all.
pub fn has_data(values: &[f64], min_points: usize) -> bool {
    values.len() >= min_points
}

fn endpoints(values: &[f64], n: usize) -> Option<(f64, f64)> {
    if values.len() <= n {
        return None;
    }
    let last = values[values.len() - 1];
    let reference = values[values.len() - 1 - n];
    Some((reference, last))
}

/// Change over `n` periods in basis points: `(last - ref) × 100`.
pub fn bp_change(values: &[f64], n: usize) -> Option<f64> {
    endpoints(values, n).map(|(reference, last)| (last - reference) * 100.0)
}

/// Change over `n` periods in percent. `None` when the reference is zero.
pub fn pct_change(values: &[f64], n: usize) -> Option<f64> {
    let (reference, last) = endpoints(values, n)?;
    if reference == 0.0 {
        return None;
    }
    Some((last / reference - 1.0) * 100.0)
}

/// Change over `n` periods in percentage points (plain difference).
pub fn pp_change(values: &[f64], n: usize) -> Option<f64> {
    endpoints(values, n).map(|(reference, last)| last - reference)
}

/// True iff at least `n` flags exist and the last `n` are all true.
pub fn consec_last_n(flags: &[bool], n: usize) -> bool {
    flags.len() >= n && flags[flags.len() - n..].iter().all(|f| *f)
}
