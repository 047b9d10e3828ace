//! Turns loosely formatted indicator sheets into clean numeric time series.

pub mod coerce;
pub mod columns;
pub mod header;
pub mod loader;
pub mod table;

pub use coerce::{parse_date, parse_number};
pub use columns::{select_date_column, select_value_column};
pub use header::detect_header;
pub use loader::{load_csv_path, load_timeseries, LoadedSeries};
pub use table::{Cell, Frame, Table};
