use crate::indicators::*;
use chrono::Datelike;
use monitor_core::{Stamp, TimeSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Return horizons (periods) reported for every indicator.
pub const RETURN_WINDOWS: [usize; 3] = [20, 60, 120];

const PERFORMANCE_PERIODS: [(&str, usize); 4] = [("1m", 21), ("3m", 63), ("6m", 126), ("1y", 252)];

/// Benchmarks tried, in order, for beta.
pub const MARKET_BENCHMARKS: [&str; 3] = ["KOSPI", "S&P500", "KOSDAQ"];

const CORR_DAYS: usize = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub last: f64,
    pub asof: Option<String>,
    pub ytd: Option<f64>,
    #[serde(rename = "1m")]
    pub one_month: Option<f64>,
    #[serde(rename = "3m")]
    pub three_month: Option<f64>,
    #[serde(rename = "6m")]
    pub six_month: Option<f64>,
    #[serde(rename = "1y")]
    pub one_year: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawdownStats {
    pub mdd_6m: Option<f64>,
    pub dd_6m: Option<f64>,
    pub mdd_1y: Option<f64>,
    pub dd_1y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendStats {
    pub sma20: Option<f64>,
    pub sma60: Option<f64>,
    pub sma120: Option<f64>,
    pub ema20: Option<f64>,
    pub ema60: Option<f64>,
    pub ema120: Option<f64>,
    pub gaps: BTreeMap<String, Option<f64>>,
    pub cross_20_60: Option<CrossState>,
    pub cross_60_120: Option<CrossState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeStats {
    pub slope: Option<f64>,
    pub tstat: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangePosition {
    pub pos_0to1: Option<f64>,
    pub pos_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeStats {
    pub trend: Option<Trend>,
    pub vol: Option<VolRegime>,
    /// `"{trend}-{vol}"` when both are known.
    pub regime: Option<String>,
}

/// Descriptive metrics for one indicator series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub latest: LatestSnapshot,
    pub returns: BTreeMap<String, Option<f64>>,
    pub vol: BTreeMap<String, Option<f64>>,
    pub mdd: DrawdownStats,
    pub trend: TrendStats,
    pub slope60: SlopeStats,
    pub pos_52w: RangePosition,
    pub regime: RegimeStats,
    pub corr60: BTreeMap<String, Option<f64>>,
    pub beta60: BTreeMap<String, Option<f64>>,
}

impl DerivedMetrics {
    /// One `(suffix, json)` entry per report row, `summary` last.
    /// Correlation and beta are skipped when no benchmark was supplied.
    pub fn sections(&self) -> Result<Vec<(&'static str, serde_json::Value)>, serde_json::Error> {
        let mut out = vec![
            ("returns", serde_json::to_value(&self.returns)?),
            ("vol", serde_json::to_value(&self.vol)?),
            ("mdd", serde_json::to_value(&self.mdd)?),
            ("trend", serde_json::to_value(&self.trend)?),
            ("slope60", serde_json::to_value(&self.slope60)?),
            ("pos_52w", serde_json::to_value(&self.pos_52w)?),
            ("regime", serde_json::to_value(&self.regime)?),
        ];
        if !self.corr60.is_empty() {
            out.push(("corr60", serde_json::to_value(&self.corr60)?));
        }
        if !self.beta60.is_empty() {
            out.push(("beta60", serde_json::to_value(&self.beta60)?));
        }
        out.push(("latest", serde_json::to_value(&self.latest)?));
        out.push(("summary", serde_json::to_value(self)?));
        Ok(out)
    }
}

fn returns_series(series: &TimeSeries) -> TimeSeries {
    let stamps = series.stamps();
    let values = series.values();
    TimeSeries::from_points(
        format!("{}:ret", series.name()),
        (1..values.len()).map(|i| (stamps[i], values[i] / values[i - 1] - 1.0)),
    )
}

/// Last `days` date-aligned return pairs of `x` against `y`.
fn return_pairs(x: &TimeSeries, y: &TimeSeries, days: usize) -> Option<Vec<(f64, f64)>> {
    if x.len() < days + 1 || y.len() < days + 1 {
        return None;
    }
    let aligned = returns_series(x).align(&returns_series(y));
    let start = aligned.len().saturating_sub(days);
    Some(aligned[start..].iter().map(|(_, a, b)| (*a, *b)).collect())
}

fn year_to_date(series: &TimeSeries, last: f64) -> Option<f64> {
    let latest = series.last_stamp()?.date()?;
    let (_, first) = series
        .dated_points()
        .find(|(d, _)| d.year() == latest.year())?;
    if first == 0.0 {
        return None;
    }
    Some(last / first - 1.0)
}

/// Compute every derived metric for `series`. Benchmarks are matched by date.
pub fn derive_metrics(series: &TimeSeries, benchmarks: &[(&str, &TimeSeries)]) -> Option<DerivedMetrics> {
    let data = series.values();
    let last = *data.last()?;

    let mut returns = BTreeMap::new();
    let mut vol = BTreeMap::new();
    for days in RETURN_WINDOWS {
        let r = period_return(data, days);
        returns.insert(format!("{}d", days), r);
        returns.insert(format!("{}d_ann", days), annualize_return(r, days));
        vol.insert(format!("{}d_vol_ann", days), rolling_vol_annualized(data, days));
    }

    let perf: BTreeMap<&str, Option<f64>> = PERFORMANCE_PERIODS
        .iter()
        .map(|(label, days)| (*label, period_return(data, *days)))
        .collect();
    let perf_of = |label: &str| perf.get(label).copied().flatten();

    let latest = LatestSnapshot {
        last,
        asof: match series.last_stamp() {
            Some(stamp @ Stamp::Date(_)) => Some(stamp.to_string()),
            _ => None,
        },
        ytd: year_to_date(series, last),
        one_month: perf_of("1m"),
        three_month: perf_of("3m"),
        six_month: perf_of("6m"),
        one_year: perf_of("1y"),
    };

    let dd6 = drawdown_stats(data, 126);
    let dd1y = drawdown_stats(data, 252);
    let mdd = DrawdownStats {
        mdd_6m: dd6.map(|d| d.0),
        dd_6m: dd6.map(|d| d.1),
        mdd_1y: dd1y.map(|d| d.0),
        dd_1y: dd1y.map(|d| d.1),
    };

    let (sma20, sma60, sma120) = (sma(data, 20), sma(data, 60), sma(data, 120));
    let (ema20, ema60, ema120) = (ema(data, 20), ema(data, 60), ema(data, 120));
    let gaps = [
        ("gap_to_sma20", sma20),
        ("gap_to_sma60", sma60),
        ("gap_to_sma120", sma120),
        ("gap_to_ema20", ema20),
        ("gap_to_ema60", ema60),
        ("gap_to_ema120", ema120),
    ]
    .into_iter()
    .map(|(k, reference)| (k.to_string(), gap_pct(last, reference)))
    .collect();

    let trend = TrendStats {
        sma20,
        sma60,
        sma120,
        ema20,
        ema60,
        ema120,
        gaps,
        cross_20_60: cross_state(data, 20, 60),
        cross_60_120: cross_state(data, 60, 120),
    };

    let slope = slope_tstat(data, 60);
    let slope60 = SlopeStats {
        slope: slope.map(|s| s.0),
        tstat: slope.and_then(|s| s.1),
    };

    let pos = pos_in_52w(data);
    let pos_52w = RangePosition {
        pos_0to1: pos,
        pos_pct: pos.map(|p| p * 100.0),
    };

    let trend_reg = trend_label(data, 60);
    let vol_reg = vol_regime(data, 60);
    let regime = RegimeStats {
        trend: trend_reg,
        vol: vol_reg,
        regime: match (trend_reg, vol_reg) {
            (Some(t), Some(v)) => Some(format!("{}-{}", t.as_str(), v.as_str())),
            _ => None,
        },
    };

    let corr60 = benchmarks
        .iter()
        .map(|(name, bench)| {
            let corr = return_pairs(series, bench, CORR_DAYS)
                .filter(|pairs| pairs.len() == CORR_DAYS)
                .and_then(|pairs| correlation(&pairs));
            (name.to_string(), corr)
        })
        .collect();

    let mut beta60 = BTreeMap::new();
    if let Some((name, market)) = MARKET_BENCHMARKS
        .iter()
        .find_map(|key| benchmarks.iter().find(|(n, _)| n == key))
    {
        let min_pairs = (CORR_DAYS as f64 * 0.6) as usize;
        let b = return_pairs(series, market, CORR_DAYS).and_then(|pairs| beta(&pairs, min_pairs));
        beta60.insert(name.to_string(), b);
    }

    Some(DerivedMetrics {
        latest,
        returns,
        vol,
        mdd,
        trend,
        slope60,
        pos_52w,
        regime,
        corr60,
        beta60,
    })
}
