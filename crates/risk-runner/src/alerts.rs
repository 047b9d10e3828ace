//! Alert message and row-flag propagation from a dated breach table.

use crate::args;
use alert_aggregator::{
    breach_file_name, dispatch, find_latest_breach_file, propagate_flags, render_message,
    write_row_flags, AlertSummary, BreachTable, FileSink, StdoutSink, DEFAULT_MAX_INDICATOR,
    DEFAULT_START_INDICATOR,
};
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use monitor_core::{MessageSink, MonitorConfig};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The breach table for `date`, or the newest one by file-name date.
fn locate_table(dir: &Path, date: Option<NaiveDate>) -> Result<(NaiveDate, PathBuf)> {
    match date {
        Some(d) => {
            let path = dir.join(breach_file_name(d));
            if !path.exists() {
                bail!("breach table not found: {}", path.display());
            }
            Ok((d, path))
        }
        None => find_latest_breach_file(dir)?
            .ok_or_else(|| anyhow!("no risk_thresholds_YYYYMMDD.csv in {}", dir.display())),
    }
}

/// Render the alert text for a breach-table directory.
pub fn build_message(args: &[String], config: &MonitorConfig) -> Result<String> {
    let dir = args::path(args, "--dir")?;
    let (date, path) = locate_table(&dir, args::date(args, "--date")?)?;
    tracing::info!("Alert source: {}", path.display());

    let table = BreachTable::from_path(&path).with_context(|| format!("reading {}", path.display()))?;
    let summary = AlertSummary::select(&table, date);
    Ok(render_message(&summary, &config.dashboard_url))
}

pub fn run_alert(args: &[String], config: &MonitorConfig) -> Result<()> {
    let message = build_message(args, config)?;

    let mut sinks: Vec<Box<dyn MessageSink>> = vec![Box::new(StdoutSink)];
    if let Some(out) = args::value(args, "--out") {
        sinks.push(Box::new(FileSink::new(out)));
    }
    let destination = args::value(args, "--to").unwrap_or("");

    let delivered = dispatch(
        &sinks,
        destination,
        &message,
        Duration::from_millis(config.call_delay_ms),
    );
    if delivered == 0 {
        bail!("alert was not delivered to any sink");
    }
    Ok(())
}

pub fn run_propagate(args: &[String]) -> Result<()> {
    let dir = args::path(args, "--dir")?;
    let start = args::parsed(args, "--start", DEFAULT_START_INDICATOR)?;
    let max = args::parsed(args, "--max", DEFAULT_MAX_INDICATOR)?;
    let prefix = args::value(args, "--prefix").unwrap_or("IND");

    let (date, path) = locate_table(&dir, args::date(args, "--date")?)?;
    tracing::info!("Propagating flags from {}", path.display());

    let table = BreachTable::from_path(&path)?;
    let flags = propagate_flags(&table, start, max);

    let out = args::value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| dir.join(format!("row_flags_{}.csv", date.format("%Y%m%d"))));
    let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    write_row_flags(&flags, prefix, file)?;

    let raised = flags.iter().filter(|f| f.flag == monitor_core::Flag::Y).count();
    tracing::info!(
        "{} indicators flagged ({} raised) -> {}",
        flags.len(),
        raised,
        out.display()
    );
    Ok(())
}
