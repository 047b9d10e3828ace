//! Descriptive metrics per indicator, one `id, name, ticker, data` row per section.

use crate::args;
use crate::flags::SheetRange;
use anyhow::{anyhow, bail, Context, Result};
use monitor_core::{MonitorConfig, MonitorError, TimeSeries};
use rolling_stats::derive_metrics;
use series_normalizer::load_csv_path;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ID_COLUMN: &str = "Indicator_ID";
const NAME_COLUMN: &str = "Indicator_Name";
const TICKER_COLUMN: &str = "Bloomberg_Ticker";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub ticker: String,
}

/// Indicator directory keyed by ID. A file without the ID column is rejected.
pub fn read_directory<R: Read>(reader: R) -> Result<HashMap<String, DirectoryEntry>, MonitorError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let id_idx = position(ID_COLUMN).ok_or_else(|| MonitorError::MissingColumn(ID_COLUMN.to_string()))?;
    let name_idx = position(NAME_COLUMN);
    let ticker_idx = position(TICKER_COLUMN);

    let mut out = HashMap::new();
    for record in rdr.records() {
        let record = record?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let id = cell(Some(id_idx));
        if id.is_empty() {
            continue;
        }
        out.insert(
            id,
            DirectoryEntry {
                name: cell(name_idx),
                ticker: cell(ticker_idx),
            },
        );
    }
    Ok(out)
}

/// `NAME=ID` pairs naming which indicators serve as benchmarks.
fn parse_benchmarks(args: &[String]) -> Result<Vec<(String, String)>> {
    args::values(args, "--benchmark")
        .into_iter()
        .map(|spec| {
            spec.split_once('=')
                .map(|(name, id)| (name.trim().to_string(), id.trim().to_string()))
                .ok_or_else(|| anyhow!("--benchmark expects NAME=ID, got {}", spec))
        })
        .collect()
}

fn load_all(range: &SheetRange, config: &MonitorConfig) -> BTreeMap<String, TimeSeries> {
    let mut series = BTreeMap::new();
    for (id, path) in range.sheets() {
        if !path.exists() {
            tracing::debug!("[SKIP] {}: file not found", id);
            continue;
        }
        match load_csv_path(&path, config) {
            Ok(loaded) => {
                series.insert(id, loaded.series);
            }
            Err(e) => tracing::warn!("[SKIP] {}: {}", id, e),
        }
    }
    series
}

pub fn run(args: &[String], config: &MonitorConfig) -> Result<()> {
    let range = SheetRange::from_args(args)?;
    let out_path = args::path(args, "--out")?;

    let directory = match args::value(args, "--directory") {
        Some(p) => {
            let file = File::open(p).with_context(|| format!("opening {}", p))?;
            read_directory(file).with_context(|| format!("reading indicator directory {}", p))?
        }
        None => HashMap::new(),
    };

    let series = load_all(&range, config);
    if series.is_empty() {
        bail!("no usable indicator series in {}", range.dir.display());
    }

    let mut benchmarks: Vec<(String, &TimeSeries)> = Vec::new();
    for (name, id) in parse_benchmarks(args)? {
        match series.get(&id) {
            Some(s) => benchmarks.push((name, s)),
            None => tracing::warn!("Benchmark {} ({}) has no series", name, id),
        }
    }
    let bench_refs: Vec<(&str, &TimeSeries)> =
        benchmarks.iter().map(|(n, s)| (n.as_str(), *s)).collect();

    write_metrics(&out_path, &series, &bench_refs, &directory)
}

fn write_metrics(
    out_path: &Path,
    series: &BTreeMap<String, TimeSeries>,
    benchmarks: &[(&str, &TimeSeries)],
    directory: &HashMap<String, DirectoryEntry>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    wtr.write_record(["id", "name", "ticker", "data"])?;

    let mut written = 0;
    for (id, s) in series {
        let Some(metrics) = derive_metrics(s, benchmarks) else {
            tracing::warn!("[SKIP] {}: empty series", id);
            continue;
        };
        let entry = directory.get(id).cloned().unwrap_or_default();
        for (suffix, value) in metrics.sections()? {
            wtr.write_record([
                format!("{}:{}", id, suffix),
                entry.name.clone(),
                entry.ticker.clone(),
                serde_json::to_string(&value)?,
            ])?;
            written += 1;
        }
    }
    wtr.flush()?;
    tracing::info!("[OK] {} rows written to {}", written, out_path.display());
    Ok(())
}
