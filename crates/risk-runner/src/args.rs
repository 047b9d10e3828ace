//! Flag-style argument helpers: `--name value`.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::str::FromStr;

pub fn value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// Every value given for a repeatable flag.
pub fn values<'a>(args: &'a [String], name: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == name)
        .map(|w| w[1].as_str())
        .collect()
}

pub fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    value(args, name).ok_or_else(|| anyhow!("missing required argument {}", name))
}

pub fn path(args: &[String], name: &str) -> Result<PathBuf> {
    required(args, name).map(PathBuf::from)
}

pub fn parsed<T>(args: &[String], name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value(args, name) {
        Some(v) => v
            .parse()
            .with_context(|| format!("invalid value for {}: {}", name, v)),
        None => Ok(default),
    }
}

pub fn date(args: &[String], name: &str) -> Result<Option<NaiveDate>> {
    value(args, name)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .with_context(|| format!("{} expects YYYY-MM-DD, got {}", name, v))
        })
        .transpose()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_value_lookup() {
        let a = args("risk-runner flags --dir data --from 3 --benchmark KOSPI=IND001 --benchmark S&P500=IND002");
        assert_eq!(value(&a, "--dir"), Some("data"));
        assert_eq!(parsed(&a, "--from", 1u32).unwrap(), 3);
        assert_eq!(parsed(&a, "--to", 151u32).unwrap(), 151);
        assert_eq!(values(&a, "--benchmark"), vec!["KOSPI=IND001", "S&P500=IND002"]);
        assert!(required(&a, "--out").is_err());
    }

    #[test]
    fn test_date_argument() {
        let a = args("x --date 2025-10-06");
        assert_eq!(date(&a, "--date").unwrap(), NaiveDate::from_ymd_opt(2025, 10, 6));
        assert!(date(&args("x --date 06/10/2025"), "--date").is_err());
        assert_eq!(date(&args("x"), "--date").unwrap(), None);
    }
}
