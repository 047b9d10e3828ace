//! Named cross-instrument breach rules over daily market series.

pub mod catalog;
pub mod panel;
pub mod report;
pub mod rules;
pub mod shapes;
pub mod thresholds;

#[cfg(test)]
mod rules_tests;

pub use catalog::{Instrument, InstrumentCatalog, InstrumentKind};
pub use panel::{Panel, ResolvedSeries};
pub use report::{write_breach_report, write_raw_table};
pub use rules::BreachRegistry;
pub use shapes::{Trigger, Unit};
pub use thresholds::BreachThresholds;
