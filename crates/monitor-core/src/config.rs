use crate::error::MonitorError;
use crate::types::{CustomThreshold, Direction, FlagPolicy, Level};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_WINDOW: usize = 60;
pub const DEFAULT_K: f64 = 2.0;
pub const DEFAULT_DASHBOARD_URL: &str = "https://chartupndown.com/risk_monitor";

/// Minimum valid points required before rolling statistics are defined.
pub fn default_min_periods(window: usize) -> usize {
    30.max(window / 2)
}

/// Runtime configuration shared by every component. Passed explicitly, never global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    // Rolling statistics
    pub window: usize,
    pub min_periods: usize,
    pub k: f64,

    // Threshold ladder
    pub auto_multipliers: [f64; 3],
    pub flag_policy: FlagPolicy,
    pub custom_thresholds: HashMap<String, CustomThreshold>,

    // Sheet normalization
    pub date_hints: Vec<String>,
    pub value_hints: Vec<String>,
    pub header_scan_rows: usize,
    pub header_probe_rows: usize,
    pub date_ratio_floor: f64,

    // Breach catalog and alerting
    pub breach_thresholds_file: Option<PathBuf>,
    pub dashboard_url: String,
    pub call_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut custom_thresholds = HashMap::new();
        // USDKRW level ladder
        custom_thresholds.insert(
            "IND071".to_string(),
            CustomThreshold {
                direction: Direction::Up,
                yellow: 1400.0,
                orange: 1600.0,
                red: 1800.0,
            },
        );

        Self {
            window: DEFAULT_WINDOW,
            min_periods: default_min_periods(DEFAULT_WINDOW),
            k: DEFAULT_K,
            auto_multipliers: [1.1, 1.2, 1.3],
            flag_policy: FlagPolicy::default(),
            custom_thresholds,
            date_hints: ["date", "날짜", "일자", "time", "일시"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            value_hints: [
                "close", "price", "value", "index", "지수", "종가", "가격", "값", "수치",
                "PX_LAST",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            header_scan_rows: 10,
            header_probe_rows: 5,
            date_ratio_floor: 0.7,
            breach_thresholds_file: None,
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            call_delay_ms: 0,
        }
    }
}

impl MonitorConfig {
    /// Load from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, MonitorError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(window) = env_parse::<usize>("RISK_WINDOW")? {
            config = config.with_window(window);
        }
        if let Some(min_periods) = env_parse::<usize>("RISK_MIN_PERIODS")? {
            config.min_periods = min_periods;
        }
        if let Some(k) = env_parse::<f64>("RISK_K")? {
            config.k = k;
        }
        if let Ok(level) = env::var("RISK_ALERT_LEVEL") {
            config.flag_policy = FlagPolicy {
                alert_from: parse_alert_level(&level)?,
            };
        }
        if let Ok(path) = env::var("RISK_CUSTOM_THRESHOLDS_FILE") {
            config.load_custom_thresholds(Path::new(&path))?;
        }
        if let Ok(path) = env::var("RISK_BREACH_THRESHOLDS_FILE") {
            config.breach_thresholds_file = Some(PathBuf::from(path));
        }
        if let Ok(url) = env::var("RISK_DASHBOARD_URL") {
            config.dashboard_url = url;
        }
        if let Some(delay) = env_parse::<u64>("RISK_CALL_DELAY_MS")? {
            config.call_delay_ms = delay;
        }

        config.validate()?;
        Ok(config)
    }

    /// Change the window and reset `min_periods` to its default for that window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self.min_periods = default_min_periods(window);
        self
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.window == 0 {
            return Err(MonitorError::InvalidConfig("window must be positive".to_string()));
        }
        if self.min_periods == 0 {
            return Err(MonitorError::InvalidConfig(
                "min_periods must be positive".to_string(),
            ));
        }
        for (id, ladder) in &self.custom_thresholds {
            let ordered = match ladder.direction {
                Direction::Up => ladder.yellow <= ladder.orange && ladder.orange <= ladder.red,
                Direction::Down => ladder.yellow >= ladder.orange && ladder.orange >= ladder.red,
            };
            if !ordered {
                return Err(MonitorError::InvalidConfig(format!(
                    "ladder for {} is not ordered by severity",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Custom ladder for an indicator ID, matched case-insensitively.
    pub fn custom_threshold(&self, indicator_id: &str) -> Option<&CustomThreshold> {
        self.custom_thresholds
            .get(&indicator_id.trim().to_uppercase())
    }

    /// Merge ladders from a JSON object keyed by indicator ID.
    pub fn load_custom_thresholds(&mut self, path: &Path) -> Result<usize, MonitorError> {
        let text = std::fs::read_to_string(path)?;
        let ladders: HashMap<String, CustomThreshold> = serde_json::from_str(&text)?;
        let count = ladders.len();
        for (id, ladder) in ladders {
            self.custom_thresholds.insert(id.trim().to_uppercase(), ladder);
        }
        tracing::debug!("Loaded {} custom ladders from {}", count, path.display());
        Ok(count)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, MonitorError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| MonitorError::InvalidConfig(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

fn parse_alert_level(raw: &str) -> Result<Level, MonitorError> {
    match raw.parse::<Level>() {
        Ok(Level::Normal) => Err(MonitorError::InvalidConfig(
            "RISK_ALERT_LEVEL must be yellow, orange or red".to_string(),
        )),
        Ok(level) => Ok(level),
        Err(e) => Err(MonitorError::InvalidConfig(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_periods_floor() {
        assert_eq!(default_min_periods(60), 30);
        assert_eq!(default_min_periods(120), 60);
        assert_eq!(default_min_periods(10), 30);
    }

    #[test]
    fn test_default_config_has_usdkrw_ladder() {
        let config = MonitorConfig::default();
        let ladder = config.custom_threshold("ind071").unwrap();
        assert_eq!(ladder.direction, Direction::Up);
        assert_eq!(ladder.red, 1800.0);
        assert!(config.custom_threshold("IND001").is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_window_resets_min_periods() {
        let config = MonitorConfig::default().with_window(200);
        assert_eq!(config.window, 200);
        assert_eq!(config.min_periods, 100);
    }

    #[test]
    fn test_validate_rejects_unordered_ladder() {
        let mut config = MonitorConfig::default();
        config.custom_thresholds.insert(
            "IND002".to_string(),
            CustomThreshold {
                direction: Direction::Down,
                yellow: 1.0,
                orange: 2.0,
                red: 3.0,
            },
        );
        assert!(matches!(config.validate(), Err(MonitorError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_alert_level() {
        assert_eq!(parse_alert_level("Orange").unwrap(), Level::Orange);
        assert!(parse_alert_level("normal").is_err());
        assert!(parse_alert_level("purple").is_err());
    }
}
