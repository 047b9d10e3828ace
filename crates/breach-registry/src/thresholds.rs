use monitor_core::MonitorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Limits for every catalog rule. Missing keys in an override file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreachThresholds {
    // Domestic rates, bp
    pub kr3y_1d_bp: f64,
    pub kr3y_10d_bp: f64,
    pub kr10y_1d_bp: f64,
    pub kr10y_10d_bp: f64,

    // FX, equities and vol
    pub usdkrw_1d_pct: f64,
    pub usdkrw_10d_pct: f64,
    pub kospi_1d_down_pct: f64,
    pub kospi_10d_down_pct: f64,
    pub vkospi_1d_up_pp: f64,
    pub vkospi_10d_up_pp: f64,
    pub krw_iv_1d_pp: f64,
    pub krw_iv_10d_pp: f64,
    pub spx_1d_down_pct: f64,
    pub spx_10d_down_pct: f64,
    pub sx5e_1d_abs_pct: f64,
    pub sx5e_10d_down_pct: f64,

    // Deviation from the trailing 3M average
    pub g3m_dev_bp: f64,

    // Spreads and levels
    pub ois1y_minus_tsfr1m_mtd_bp: f64,
    pub kr1y_minus_base_level_bp: f64,
    pub kr1y_minus_base_days: usize,
    pub base_minus_call_bp: f64,
    pub kr_10y_3y_inversion_days: usize,
    pub fin1y_minus_cd3m_mtd_bp: f64,
    pub fin1y_aaa_minus_ktb1y_bp: f64,
    pub fin1y_aaa_minus_ktb1y_days: usize,

    // Month over month
    pub tsfr3m_prev_month_abs_bp: f64,
    pub jpy_tibor3m_prev_month_abs_bp: f64,
    pub fraois_prev_month_bp: f64,
    pub cds_prev_month_pct_up: f64,
    pub ktb3y_corp3y_ratio_prev_month_pct: f64,

    // Korea 5Y CDS against monthly baselines
    pub kr5y_cds_prev_month_bp: f64,
    pub kr5y_cds_three_months_ago_bp: f64,
    pub kr5y_cds_days: usize,
}

impl Default for BreachThresholds {
    fn default() -> Self {
        Self {
            kr3y_1d_bp: 15.0,
            kr3y_10d_bp: 50.0,
            kr10y_1d_bp: 15.0,
            kr10y_10d_bp: 45.0,

            usdkrw_1d_pct: 2.0,
            usdkrw_10d_pct: 5.0,
            kospi_1d_down_pct: -3.5,
            kospi_10d_down_pct: -10.0,
            vkospi_1d_up_pp: 5.0,
            vkospi_10d_up_pp: 10.0,
            krw_iv_1d_pp: 5.0,
            krw_iv_10d_pp: 10.0,
            spx_1d_down_pct: -3.0,
            spx_10d_down_pct: -12.0,
            sx5e_1d_abs_pct: 3.0,
            sx5e_10d_down_pct: -12.0,

            g3m_dev_bp: 100.0,

            ois1y_minus_tsfr1m_mtd_bp: 150.0,
            kr1y_minus_base_level_bp: -24.0,
            kr1y_minus_base_days: 5,
            base_minus_call_bp: 40.0,
            kr_10y_3y_inversion_days: 5,
            fin1y_minus_cd3m_mtd_bp: 70.0,
            fin1y_aaa_minus_ktb1y_bp: 50.0,
            fin1y_aaa_minus_ktb1y_days: 5,

            tsfr3m_prev_month_abs_bp: 75.0,
            jpy_tibor3m_prev_month_abs_bp: 25.0,
            fraois_prev_month_bp: 30.0,
            cds_prev_month_pct_up: 30.0,
            ktb3y_corp3y_ratio_prev_month_pct: 16.0,

            kr5y_cds_prev_month_bp: 100.0,
            kr5y_cds_three_months_ago_bp: 200.0,
            kr5y_cds_days: 3,
        }
    }
}

impl BreachThresholds {
    pub fn from_json_file(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path)?;
        let thresholds = serde_json::from_str(&text)?;
        tracing::info!("Loaded breach thresholds from {}", path.display());
        Ok(thresholds)
    }
}
