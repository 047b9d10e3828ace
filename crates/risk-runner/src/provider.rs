//! Long-format quote file as a `SeriesProvider`: one `date,ticker,field,value` row per quote.

use chrono::NaiveDate;
use monitor_core::{FieldSeries, MonitorError, SeriesProvider, TimeSeries};
use series_normalizer::{parse_date, parse_number};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::PathBuf;

const REQUIRED_COLUMNS: [&str; 4] = ["date", "ticker", "field", "value"];

pub struct CsvQuoteProvider {
    path: PathBuf,
}

impl CsvQuoteProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesProvider for CsvQuoteProvider {
    fn fetch(
        &self,
        tickers: &[String],
        fields: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FieldSeries>, MonitorError> {
        let mut rdr = csv::Reader::from_reader(File::open(&self.path)?);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut idx = [0usize; 4];
        for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MonitorError::MissingColumn(name.to_string()))?;
        }
        let [date_i, ticker_i, field_i, value_i] = idx;

        let wanted_tickers: HashSet<&str> = tickers.iter().map(|t| t.as_str()).collect();
        let wanted_fields: HashSet<&str> = fields.iter().map(|f| f.as_str()).collect();

        let mut points: BTreeMap<(String, String), Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let ticker = record.get(ticker_i).unwrap_or("").trim();
            let field = record.get(field_i).unwrap_or("").trim();
            if !wanted_tickers.contains(ticker) || !wanted_fields.contains(field) {
                continue;
            }
            let Some(date) = record.get(date_i).and_then(parse_date) else {
                continue;
            };
            if date < start || date > end {
                continue;
            }
            if let Some(v) = record.get(value_i).and_then(parse_number) {
                points
                    .entry((ticker.to_string(), field.to_string()))
                    .or_default()
                    .push((date, v));
            }
        }

        tracing::info!(
            "{}: {} ticker/field series between {} and {}",
            self.name(),
            points.len(),
            start,
            end
        );

        Ok(points
            .into_iter()
            .map(|((ticker, field), pts)| FieldSeries {
                series: TimeSeries::from_dated(format!("{}|{}", ticker, field), pts),
                ticker,
                field,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "csv-quotes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_filters_tickers_fields_and_dates() {
        let path = std::env::temp_dir().join(format!("quotes-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "date,ticker,field,value\n\
             2025-01-02,SPX Index,PX_LAST,5000\n\
             2025-01-03,SPX Index,PX_LAST,5050\n\
             2025-01-03,SPX Index,PX_OPEN,4990\n\
             2025-01-03,KOSPI Index,PX_LAST,2500\n\
             2024-12-01,SPX Index,PX_LAST,4000\n",
        )
        .unwrap();

        let provider = CsvQuoteProvider::new(&path);
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let fetched = provider
            .fetch(&["SPX Index".to_string()], &["PX_LAST".to_string()], start, end)
            .unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].ticker, "SPX Index");
        assert_eq!(fetched[0].series.values(), &[5000.0, 5050.0]);

        std::fs::remove_file(&path).unwrap();
    }
}
