use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("No numeric series found: {0}")]
    NoNumericSeries(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
