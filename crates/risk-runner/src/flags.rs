//! Threshold flags for every indicator sheet in a directory.

use crate::args;
use anyhow::{Context, Result};
use monitor_core::{MonitorConfig, OutputSlots, ThresholdResult};
use serde::Serialize;
use series_normalizer::{detect_header, load_timeseries, Table};
use std::fs::File;
use std::path::{Path, PathBuf};
use threshold_evaluator::ThresholdEvaluator;

pub const DEFAULT_PREFIX: &str = "IND";
pub const DEFAULT_FROM: u32 = 1;
pub const DEFAULT_TO: u32 = 151;

/// Indicator sheets `PREFIXnnn.csv` for `from..=to` in `dir`.
pub struct SheetRange {
    pub dir: PathBuf,
    pub prefix: String,
    pub from: u32,
    pub to: u32,
}

impl SheetRange {
    pub fn from_args(args: &[String]) -> Result<Self> {
        Ok(Self {
            dir: args::path(args, "--dir")?,
            prefix: args::value(args, "--prefix").unwrap_or(DEFAULT_PREFIX).to_string(),
            from: args::parsed(args, "--from", DEFAULT_FROM)?,
            to: args::parsed(args, "--to", DEFAULT_TO)?,
        })
    }

    /// `(indicator id, sheet path)` in ascending order.
    pub fn sheets(&self) -> impl Iterator<Item = (String, PathBuf)> + '_ {
        (self.from..=self.to).map(|i| {
            let id = format!("{}{:03}", self.prefix, i);
            let path = self.dir.join(format!("{}.csv", id));
            (id, path)
        })
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    file: String,
    flag: String,
    last: Option<f64>,
    mu: Option<f64>,
    sd: Option<f64>,
    zscore: Option<f64>,
    upper: Option<f64>,
    lower: Option<f64>,
    thr_yellow: Option<f64>,
    thr_orange: Option<f64>,
    thr_red: Option<f64>,
    level: Option<String>,
    reason: Option<String>,
    error: Option<String>,
}

impl SummaryRow {
    fn status(file: &str, status: &str, error: Option<String>) -> Self {
        Self {
            file: file.to_string(),
            flag: status.to_string(),
            last: None,
            mu: None,
            sd: None,
            zscore: None,
            upper: None,
            lower: None,
            thr_yellow: None,
            thr_orange: None,
            thr_red: None,
            level: None,
            reason: None,
            error,
        }
    }

    fn evaluated(file: &str, r: &ThresholdResult) -> Self {
        Self {
            file: file.to_string(),
            flag: r.flag.to_string(),
            last: r.last,
            mu: r.mu,
            sd: r.sd,
            zscore: r.zscore,
            upper: r.upper,
            lower: r.lower,
            thr_yellow: r.thr_yellow,
            thr_orange: r.thr_orange,
            thr_red: r.thr_red,
            level: Some(r.level_label().to_string()),
            reason: Some(r.reason.as_str().to_string()),
            error: None,
        }
    }
}

fn slots_path(sheet: &Path) -> PathBuf {
    sheet.with_extension("slots.csv")
}

fn write_slots(path: &Path, slots: &OutputSlots) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["flag", "mean", "std"])?;
    wtr.write_record(slots.cells())?;
    wtr.flush()?;
    Ok(())
}

fn evaluate_sheet(
    evaluator: &ThresholdEvaluator,
    id: &str,
    path: &Path,
) -> Result<ThresholdResult> {
    let table = Table::from_csv_reader(File::open(path)?)?;
    let loaded = match load_timeseries(id, &table, evaluator.config()) {
        Ok(loaded) => loaded,
        Err(e) => {
            let config = evaluator.config();
            let (row, frame) = detect_header(&table, config.header_scan_rows, config.header_probe_rows);
            tracing::warn!("{}: header row {} columns {:?}", id, row, frame.columns);
            return Err(e.into());
        }
    };

    let result = evaluator.evaluate(Some(id), &loaded.series);
    write_slots(&slots_path(path), &OutputSlots::from(&result))
        .with_context(|| format!("writing slots for {}", id))?;
    Ok(result)
}

pub fn run(args: &[String], config: &MonitorConfig) -> Result<()> {
    let range = SheetRange::from_args(args)?;
    let evaluator = ThresholdEvaluator::new(config.clone());
    let mut summary = Vec::new();

    for (id, path) in range.sheets() {
        let file = format!("{}.csv", id);
        if !path.exists() {
            tracing::warn!("[SKIP] {} (file not found)", file);
            summary.push(SummaryRow::status(&file, "missing", None));
            continue;
        }

        match evaluate_sheet(&evaluator, &id, &path) {
            Ok(result) => {
                tracing::info!(
                    "[OK] {} -> flag={}, level={}, mu={}, sd={}, z={}",
                    file,
                    result.flag,
                    result.level_label(),
                    fmt_opt(result.mu),
                    fmt_opt(result.sd),
                    result.zscore.map(|z| format!("{:.2}", z)).unwrap_or_else(|| "n/a".to_string())
                );
                summary.push(SummaryRow::evaluated(&file, &result));
            }
            Err(e) => {
                tracing::error!("[ERR] {}: {:#}", file, e);
                summary.push(SummaryRow::status(&file, "error", Some(format!("{:#}", e))));
            }
        }
    }

    let summary_path = range.dir.join(format!(
        "vol_band_summary_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    let mut wtr = csv::Writer::from_path(&summary_path)
        .with_context(|| format!("creating {}", summary_path.display()))?;
    for row in &summary {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    let flagged = summary.iter().filter(|r| r.flag == "Y").count();
    tracing::info!(
        "Summary written to {} ({} sheets, {} flagged)",
        summary_path.display(),
        summary.len(),
        flagged
    );
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{:.6}", x)).unwrap_or_else(|| "n/a".to_string())
}
