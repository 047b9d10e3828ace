pub mod calendar;
pub mod change;
pub mod derived;
pub mod indicators;
pub mod window;

#[cfg(test)]
mod stats_tests;

pub use calendar::*;
pub use change::*;
pub use derived::*;
pub use indicators::*;
pub use window::*;
