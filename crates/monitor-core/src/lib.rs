pub mod config;
pub mod error;
pub mod fallback;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use fallback::*;
pub use traits::*;
pub use types::*;
