use crate::catalog::InstrumentCatalog;
use chrono::NaiveDate;
use monitor_core::{first_preferred, FieldSeries, MonitorError, TimeSeries};
use series_normalizer::{parse_date, parse_number};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

/// Resolved daily series per catalog key.
pub type ResolvedSeries = BTreeMap<String, TimeSeries>;

const FIELD_SEPARATOR: char = '|';

/// Wide date-indexed table. Columns are named `KEY` or `KEY|FIELD`.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl Panel {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Read a raw CSV export: first column dates, one column per series.
    /// Rows with unparseable dates are skipped; duplicate dates keep the last row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, MonitorError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if headers.len() < 2 {
            return Err(MonitorError::MissingColumn(
                "raw table needs a date column and at least one series".to_string(),
            ));
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let Some(date) = record.get(0).and_then(parse_date) else {
                continue;
            };
            let values = (1..headers.len())
                .map(|i| record.get(i).and_then(parse_number))
                .collect();
            by_date.insert(date, values);
        }

        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let mut columns = BTreeMap::new();
        for (offset, name) in headers.iter().skip(1).enumerate() {
            let values = by_date.values().map(|row| row[offset]).collect();
            columns.insert(name.clone(), values);
        }

        Ok(Self { dates, columns })
    }

    /// Assemble provider output into a panel keyed by catalog key and field.
    pub fn from_field_series(fetched: &[FieldSeries], catalog: &InstrumentCatalog) -> Self {
        let dates: BTreeSet<NaiveDate> = fetched
            .iter()
            .flat_map(|f| f.series.dated_points().map(|(d, _)| d))
            .collect();
        let dates: Vec<NaiveDate> = dates.into_iter().collect();

        let mut columns = BTreeMap::new();
        for f in fetched {
            let key = catalog.key_for_ticker(&f.ticker).unwrap_or(&f.ticker);
            let by_date: BTreeMap<NaiveDate, f64> = f.series.dated_points().collect();
            let values = dates.iter().map(|d| by_date.get(d).copied()).collect();
            columns.insert(format!("{}{}{}", key, FIELD_SEPARATOR, f.field), values);
        }

        Self { dates, columns }
    }

    /// Forward-fill, then back-fill, every column.
    pub fn filled(mut self) -> Self {
        for values in self.columns.values_mut() {
            let mut last = None;
            for v in values.iter_mut() {
                match v {
                    Some(x) => last = Some(*x),
                    None => *v = last,
                }
            }
            let mut next = None;
            for v in values.iter_mut().rev() {
                match v {
                    Some(x) => next = Some(*x),
                    None => *v = next,
                }
            }
        }
        self
    }

    fn series_from_column(&self, key: &str, values: &[Option<f64>]) -> Option<TimeSeries> {
        if values.iter().all(|v| v.is_none()) {
            return None;
        }
        Some(TimeSeries::from_dated(
            key,
            self.dates
                .iter()
                .zip(values)
                .filter_map(|(d, v)| v.map(|x| (*d, x))),
        ))
    }

    /// One series per catalog key: the first preferred field with any data, else a bare
    /// `KEY` column. Keys without data are absent.
    pub fn resolve(&self, catalog: &InstrumentCatalog) -> ResolvedSeries {
        let mut out = ResolvedSeries::new();

        for instrument in catalog.instruments() {
            let key = instrument.key.as_str();
            let prefs = catalog.fields_for(key);
            let preferred = first_preferred(prefs.iter().map(|f| f.as_str()), |field: &str| {
                let column = format!("{}{}{}", key, FIELD_SEPARATOR, field);
                self.column(&column)
                    .and_then(|values| self.series_from_column(key, values))
            });

            let resolved = match preferred {
                Some((field, series)) => {
                    tracing::debug!("{}: using field {}", key, field);
                    Some(series)
                }
                None => self
                    .column(key)
                    .and_then(|values| self.series_from_column(key, values)),
            };

            match resolved {
                Some(series) => {
                    out.insert(key.to_string(), series);
                }
                None => tracing::debug!("{}: no data in panel", key),
            }
        }

        out
    }
}
