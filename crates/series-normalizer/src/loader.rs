use crate::columns::{select_date_column, select_value_column};
use crate::header::detect_header;
use crate::table::{Cell, Table};
use monitor_core::{MonitorConfig, MonitorError, TimeSeries};
use std::fs::File;
use std::path::Path;

/// A normalized series plus where it came from in the sheet.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: TimeSeries,
    pub header_row: usize,
    pub date_column: Option<String>,
    pub value_column: String,
}

/// Extract the indicator series from a raw sheet.
pub fn load_timeseries(
    name: &str,
    table: &Table,
    config: &MonitorConfig,
) -> Result<LoadedSeries, MonitorError> {
    let (header_row, frame) = detect_header(table, config.header_scan_rows, config.header_probe_rows);

    let date_idx = select_date_column(&frame, &config.date_hints, config.date_ratio_floor);
    let value_idx = select_value_column(&frame, &config.value_hints, date_idx, config.min_periods)
        .ok_or_else(|| {
            MonitorError::NoNumericSeries(format!("{} (check header and layout)", name))
        })?;

    let value_of = |row: &Vec<Cell>| row.get(value_idx).and_then(Cell::as_number);

    let series = match date_idx {
        Some(d) => TimeSeries::from_dated(
            name,
            frame.rows.iter().filter_map(|row| {
                let date = row.get(d).and_then(Cell::as_date)?;
                value_of(row).map(|v| (date, v))
            }),
        ),
        None => TimeSeries::from_sequence(name, frame.rows.iter().map(value_of)),
    };

    tracing::debug!(
        "{}: header row {}, date column {:?}, value column {:?}, {} points",
        name,
        header_row,
        date_idx.map(|i| frame.columns[i].as_str()),
        frame.columns[value_idx],
        series.len()
    );

    Ok(LoadedSeries {
        series,
        header_row,
        date_column: date_idx.map(|i| frame.columns[i].clone()),
        value_column: frame.columns[value_idx].clone(),
    })
}

/// Read a CSV sheet from disk and normalize it. The file stem names the series.
pub fn load_csv_path(path: &Path, config: &MonitorConfig) -> Result<LoadedSeries, MonitorError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let table = Table::from_csv_reader(File::open(path)?)?;
    load_timeseries(&name, &table, config)
}
