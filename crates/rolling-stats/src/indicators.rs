use crate::window::rolling_std_series;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Periods per year used for annualization.
pub const ANNUAL_DAYS: f64 = 252.0;

/// Shorter series are never judged by the derived metrics.
pub const MIN_HISTORY: usize = 30;

/// Simple Moving Average of the last `period` values
pub fn sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(data[data.len() - period..].iter().sum::<f64>() / period as f64)
}

/// Exponential Moving Average with span `period`, seeded with the first value
pub fn ema(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut value = data[0];
    for x in &data[1..] {
        value = alpha * x + (1.0 - alpha) * value;
    }
    Some(value)
}

/// Simple returns aligned with `data`; the first entry (and any division by zero) is `None`.
pub fn simple_returns(data: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(data.len());
    if data.is_empty() {
        return out;
    }
    out.push(None);
    for w in data.windows(2) {
        out.push(Some(w[1] / w[0] - 1.0).filter(|r| r.is_finite()));
    }
    out
}

/// Fractional return over `days` periods.
pub fn period_return(data: &[f64], days: usize) -> Option<f64> {
    if data.len() <= days {
        return None;
    }
    let r = data[data.len() - 1] / data[data.len() - 1 - days] - 1.0;
    Some(r).filter(|v| v.is_finite())
}

/// Compound a `days`-period return to a yearly rate.
pub fn annualize_return(r: Option<f64>, days: usize) -> Option<f64> {
    let r = r?;
    if days == 0 {
        return None;
    }
    Some((1.0 + r).powf(ANNUAL_DAYS / days as f64) - 1.0).filter(|v| v.is_finite())
}

/// Annualized rolling volatility of simple returns at the last point.
pub fn rolling_vol_annualized(data: &[f64], days: usize) -> Option<f64> {
    if data.len() < (days + 1).max(MIN_HISTORY) {
        return None;
    }
    let min_periods = (days as f64 * 0.6) as usize;
    rolling_std_series(&simple_returns(data), days, min_periods)
        .last()
        .copied()
        .flatten()
        .map(|v| v * ANNUAL_DAYS.sqrt())
}

/// Maximum and current drawdown over the last `lookback` points.
pub fn drawdown_stats(data: &[f64], lookback: usize) -> Option<(f64, f64)> {
    if lookback == 0 || data.len() < lookback.max(MIN_HISTORY) {
        return None;
    }
    let window = &data[data.len() - lookback..];
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    let mut current = 0.0;
    for &x in window {
        peak = peak.max(x);
        current = x / peak - 1.0;
        max_dd = max_dd.min(current);
    }
    Some((max_dd, current))
}

/// Relative distance of `price` from a reference level.
pub fn gap_pct(price: f64, reference: Option<f64>) -> Option<f64> {
    match reference {
        Some(r) if r != 0.0 => Some(price / r - 1.0),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossState {
    Golden,
    Dead,
    None,
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Whether the short SMA crossed the long SMA on the last step.
pub fn cross_state(data: &[f64], short: usize, long: usize) -> Option<CrossState> {
    if data.len() < long + 1 {
        return None;
    }
    let prev_data = &data[..data.len() - 1];
    let prev = sign(sma(prev_data, short)? - sma(prev_data, long)?);
    let curr = sign(sma(data, short)? - sma(data, long)?);

    Some(if prev <= 0.0 && curr > 0.0 {
        CrossState::Golden
    } else if prev >= 0.0 && curr < 0.0 {
        CrossState::Dead
    } else {
        CrossState::None
    })
}

/// OLS slope of the last `n` points against their index, and its t-statistic.
pub fn slope_tstat(data: &[f64], n: usize) -> Option<(f64, Option<f64>)> {
    if n < 3 || data.len() < n {
        return None;
    }
    let y = &data[data.len() - n..];
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = y.mean();

    let (mut cov_xy, mut var_x) = (0.0, 0.0);
    for (i, yi) in y.iter().enumerate() {
        let dx = i as f64 - x_mean;
        cov_xy += dx * (yi - y_mean);
        var_x += dx * dx;
    }
    if var_x == 0.0 {
        return None;
    }

    let slope = cov_xy / var_x;
    let ssr: f64 = y
        .iter()
        .enumerate()
        .map(|(i, yi)| {
            let fitted = slope * (i as f64 - x_mean) + y_mean;
            (yi - fitted).powi(2)
        })
        .sum();
    let se = (ssr / (n - 2) as f64 / var_x).sqrt();
    let tstat = if se != 0.0 { Some(slope / se) } else { None };
    Some((slope, tstat))
}

/// Position of the last value inside the trailing 252-point range, 0..=1.
pub fn pos_in_52w(data: &[f64]) -> Option<f64> {
    if data.len() < 20 {
        return None;
    }
    let look = &data[data.len() - data.len().min(252)..];
    let hi = look.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let lo = look.iter().cloned().fold(f64::INFINITY, f64::min);
    if hi == lo {
        return None;
    }
    let last = look[look.len() - 1];
    Some((last - lo) / (hi - lo))
}

/// Linear-interpolated quantile of unsorted data.
pub fn quantile(data: &[f64], q: f64) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolRegime {
    Low,
    Mid,
    High,
}

impl VolRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolRegime::Low => "low",
            VolRegime::Mid => "mid",
            VolRegime::High => "high",
        }
    }
}

/// Classify current rolling volatility against its own history (33 % / 66 % quantiles).
pub fn vol_regime(data: &[f64], days: usize) -> Option<VolRegime> {
    if data.len() < (days + 20).max(MIN_HISTORY + 20) {
        return None;
    }
    let min_periods = (days as f64 * 0.6) as usize;
    let vols = rolling_std_series(&simple_returns(data), days, min_periods);
    let current = (*vols.last()?)?;
    let history: Vec<f64> = vols.iter().flatten().copied().collect();
    if history.len() < 30 {
        return None;
    }

    let q1 = quantile(&history, 0.33)?;
    let q2 = quantile(&history, 0.66)?;
    Some(if current < q1 {
        VolRegime::Low
    } else if current < q2 {
        VolRegime::Mid
    } else {
        VolRegime::High
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

/// Trend from the slope t-statistic of the last `n` points (|t| > 2 is significant).
pub fn trend_label(data: &[f64], n: usize) -> Option<Trend> {
    let (_, t) = slope_tstat(data, n)?;
    let t = t?;
    Some(if t > 2.0 {
        Trend::Up
    } else if t < -2.0 {
        Trend::Down
    } else {
        Trend::Flat
    })
}

/// Beta of `returns` on `market` over paired observations (population moments).
pub fn beta(pairs: &[(f64, f64)], min_pairs: usize) -> Option<f64> {
    if pairs.is_empty() || pairs.len() < min_pairs {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mm = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let cov = pairs.iter().map(|(x, m)| (x - mx) * (m - mm)).sum::<f64>() / n;
    let var = pairs.iter().map(|(_, m)| (m - mm).powi(2)).sum::<f64>() / n;
    if var == 0.0 {
        return None;
    }
    Some(cov / var)
}

/// Pearson correlation over paired observations.
pub fn correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let cov = pairs.iter().map(|(x, y)| (x - mx) * (y - my)).sum::<f64>();
    let vx = pairs.iter().map(|(x, _)| (x - mx).powi(2)).sum::<f64>();
    let vy = pairs.iter().map(|(_, y)| (y - my).powi(2)).sum::<f64>();
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx * vy).sqrt())
}
