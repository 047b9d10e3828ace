use crate::panel::ResolvedSeries;
use chrono::NaiveDate;
use monitor_core::{BreachRow, MonitorError};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// Write the breach table in the fixed report column order.
pub fn write_breach_report<W: Write>(rows: &[BreachRow], writer: W) -> Result<(), MonitorError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(BreachRow::COLUMNS)?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every resolved series side by side, one row per date.
pub fn write_raw_table<W: Write>(data: &ResolvedSeries, writer: W) -> Result<(), MonitorError> {
    let dates: BTreeSet<NaiveDate> = data
        .values()
        .flat_map(|s| s.dated_points().map(|(d, _)| d))
        .collect();
    let lookup: Vec<BTreeMap<NaiveDate, f64>> =
        data.values().map(|s| s.dated_points().collect()).collect();

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["Date".to_string()];
    header.extend(data.keys().cloned());
    wtr.write_record(&header)?;

    for date in dates {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(
            lookup
                .iter()
                .map(|col| col.get(&date).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
