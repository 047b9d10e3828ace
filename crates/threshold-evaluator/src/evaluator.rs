use crate::ladder::Ladder;
use monitor_core::{MonitorConfig, ReasonCode, ThresholdResult, TimeSeries};
use rolling_stats::{rolling_mean, rolling_std};

/// Judges the latest point of an indicator against its ladder.
pub struct ThresholdEvaluator {
    config: MonitorConfig,
}

impl ThresholdEvaluator {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Resolve the ladder for an indicator: custom when registered, else from `mu`.
    pub fn ladder_for(&self, indicator_id: Option<&str>, mu: f64) -> Ladder {
        indicator_id
            .and_then(|id| self.config.custom_threshold(id))
            .map(Ladder::custom)
            .unwrap_or_else(|| Ladder::auto(mu, self.config.auto_multipliers))
    }

    pub fn evaluate(&self, indicator_id: Option<&str>, series: &TimeSeries) -> ThresholdResult {
        let values = series.values();
        let id = indicator_id.map(|s| s.to_string());
        let last = series.last();

        if values.len() < self.config.min_periods {
            tracing::debug!(
                "{}: {} points, need {}",
                series.name(),
                values.len(),
                self.config.min_periods
            );
            return ThresholdResult::unjudged(id, values.len(), last, None, None, ReasonCode::TooShort);
        }

        let mu = rolling_mean(values, self.config.window, self.config.min_periods);
        let sd = rolling_std(values, self.config.window, self.config.min_periods);

        let (mu_v, sd_v, last_v) = match (mu, sd, last) {
            (Some(m), Some(s), Some(l)) if s != 0.0 => (m, s, l),
            _ => {
                return ThresholdResult::unjudged(
                    id,
                    values.len(),
                    last,
                    mu,
                    sd,
                    ReasonCode::NanOrZeroStd,
                )
            }
        };

        let ladder = self.ladder_for(indicator_id, mu_v);
        let level = ladder.classify(last_v);
        let flag = self.config.flag_policy.collapse(level);

        ThresholdResult {
            indicator_id: id,
            len: values.len(),
            last,
            mu,
            sd,
            zscore: Some((last_v - mu_v) / sd_v),
            upper: Some(mu_v + self.config.k * sd_v),
            lower: Some(mu_v - self.config.k * sd_v),
            thr_yellow: Some(ladder.yellow),
            thr_orange: Some(ladder.orange),
            thr_red: Some(ladder.red),
            direction: Some(ladder.direction),
            level: Some(level),
            flag,
            reason: ladder.reason,
        }
    }
}
