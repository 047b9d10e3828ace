//! Reduces breach tables to alert messages and per-indicator flags.

mod files;
mod propagate;
mod render;
mod sinks;
mod summary;
mod table;

pub use files::{breach_file_date, breach_file_name, find_latest_breach_file, raw_file_name};
pub use propagate::{
    propagate_flags, write_row_flags, RowFlag, DEFAULT_MAX_INDICATOR, DEFAULT_START_INDICATOR,
};
pub use render::render_message;
pub use sinks::{dispatch, FileSink, StdoutSink};
pub use summary::{AlertEntry, AlertSummary, Hit};
pub use table::{is_truthy, BreachTable};
