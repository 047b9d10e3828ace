use chrono::NaiveDate;
use monitor_core::MonitorError;
use std::fs;
use std::path::{Path, PathBuf};

const BREACH_FILE_PREFIX: &str = "risk_thresholds_";
const BREACH_FILE_EXT: &str = ".csv";

/// `risk_thresholds_YYYYMMDD.csv`
pub fn breach_file_name(date: NaiveDate) -> String {
    format!("{}{}{}", BREACH_FILE_PREFIX, date.format("%Y%m%d"), BREACH_FILE_EXT)
}

/// `risk_thresholds_YYYYMMDD.raw.csv`
pub fn raw_file_name(date: NaiveDate) -> String {
    format!("{}{}.raw{}", BREACH_FILE_PREFIX, date.format("%Y%m%d"), BREACH_FILE_EXT)
}

/// Date encoded in a breach file name; anything else (including raw tables) is `None`.
pub fn breach_file_date(file_name: &str) -> Option<NaiveDate> {
    let lower = file_name.to_ascii_lowercase();
    let stamp = lower
        .strip_prefix(BREACH_FILE_PREFIX)?
        .strip_suffix(BREACH_FILE_EXT)?;
    if stamp.len() != 8 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()
}

/// Breach file with the latest file-name date in `dir`. Modification times are ignored.
pub fn find_latest_breach_file(dir: &Path) -> Result<Option<(NaiveDate, PathBuf)>, MonitorError> {
    let mut best: Option<(NaiveDate, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(date) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(breach_file_date)
        else {
            continue;
        };
        if best.as_ref().map(|(d, _)| date > *d).unwrap_or(true) {
            best = Some((date, path));
        }
    }
    Ok(best)
}
