//! Evaluate the breach catalog over a market-data drop and write the dated report pair.

use crate::args;
use crate::provider::CsvQuoteProvider;
use alert_aggregator::{breach_file_name, raw_file_name};
use anyhow::{bail, Context, Result};
use breach_registry::{
    write_breach_report, write_raw_table, BreachRegistry, BreachThresholds, InstrumentCatalog,
    Panel,
};
use chrono::{Days, NaiveDate};
use monitor_core::{BreachRow, MonitorConfig, SeriesProvider};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Calendar days of history requested from a provider.
const HISTORY_DAYS: u64 = 420;

fn load_thresholds(config: &MonitorConfig) -> Result<BreachThresholds> {
    match &config.breach_thresholds_file {
        Some(path) => BreachThresholds::from_json_file(path)
            .with_context(|| format!("reading breach thresholds {}", path.display())),
        None => Ok(BreachThresholds::default()),
    }
}

fn load_panel(args: &[String], catalog: &InstrumentCatalog, asof: NaiveDate) -> Result<Panel> {
    if let Some(raw) = args::value(args, "--raw") {
        let file = File::open(raw).with_context(|| format!("opening {}", raw))?;
        return Ok(Panel::from_csv_reader(file)?);
    }
    if let Some(quotes) = args::value(args, "--quotes") {
        let provider = CsvQuoteProvider::new(quotes);
        let start = asof - Days::new(HISTORY_DAYS);
        let fetched = provider.fetch(&catalog.tickers(), &catalog.request_fields(), start, asof)?;
        return Ok(Panel::from_field_series(&fetched, catalog));
    }
    bail!("breaches needs --raw FILE or --quotes FILE")
}

/// Returns the breach rows and the path of the report written.
pub fn evaluate(args: &[String], config: &MonitorConfig) -> Result<(Vec<BreachRow>, PathBuf)> {
    let out_dir = args::path(args, "--out")?;
    let asof = args::date(args, "--date")?.unwrap_or_else(args::today);

    let registry = BreachRegistry::new(InstrumentCatalog::default(), load_thresholds(config)?);
    let panel = load_panel(args, registry.catalog(), asof)?.filled();
    tracing::info!("Panel: {} dates, {} columns", panel.dates().len(), panel.column_names().count());

    let resolved = panel.resolve(registry.catalog());
    let rows = registry.evaluate(&resolved);

    fs::create_dir_all(&out_dir)?;
    let report_path = out_dir.join(breach_file_name(asof));
    write_report(&report_path, |f| write_breach_report(&rows, f))?;
    write_report(&out_dir.join(raw_file_name(asof)), |f| write_raw_table(&resolved, f))?;

    Ok((rows, report_path))
}

fn write_report<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> Result<(), monitor_core::MonitorError>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write(file).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

pub fn run(args: &[String], config: &MonitorConfig) -> Result<()> {
    let (rows, path) = evaluate(args, config)?;
    for row in rows.iter().filter(|r| r.has_breach()) {
        tracing::warn!("BREACH {} ({})", row.metric, row.ticker);
    }
    tracing::info!("{} rule rows in {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_panel_to_dated_reports() {
        let dir = std::env::temp_dir().join(format!("risk-breaches-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut raw = String::from("Date,KR10Y|YLD_YTM_MID,KR3Y|YLD_YTM_MID\n");
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        for i in 0..20 {
            raw.push_str(&format!("{},3.0,3.0\n", start + Days::new(i)));
        }
        let raw_path = dir.join("raw.csv");
        fs::write(&raw_path, raw).unwrap();

        let out = dir.join("out");
        let args: Vec<String> = [
            "risk-runner",
            "breaches",
            "--raw",
            raw_path.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--date",
            "2025-09-20",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let (rows, path) = evaluate(&args, &MonitorConfig::default()).unwrap();
        assert!(path.ends_with("risk_thresholds_20250920.csv"));
        assert!(out.join("risk_thresholds_20250920.raw.csv").exists());
        assert!(rows
            .iter()
            .any(|r| r.metric.starts_with("KR Term Spread") && r.breach_1d == Some(true)));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let args: Vec<String> = ["risk-runner", "breaches", "--out", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(evaluate(&args, &MonitorConfig::default()).is_err());
    }
}
