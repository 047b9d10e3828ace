use crate::error::MonitorError;
use crate::types::TimeSeries;
use chrono::NaiveDate;

/// One fetched column: a ticker/field pair and its dated values.
#[derive(Debug, Clone)]
pub struct FieldSeries {
    pub ticker: String,
    pub field: String,
    pub series: TimeSeries,
}

/// Source of historical market data (a terminal, a vendor API, a file drop).
pub trait SeriesProvider {
    fn fetch(
        &self,
        tickers: &[String],
        fields: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FieldSeries>, MonitorError>;

    fn name(&self) -> &str;
}

/// Destination for rendered alert text.
pub trait MessageSink {
    fn send(&self, destination: &str, text: &str) -> Result<(), MonitorError>;

    fn name(&self) -> &str;
}
