//! Shewhart Core - Fundamental types
//!
//! This crate provides the core types used throughout Shewhart:
//! - `Sample` / `GroupedInterval`: the observations being analyzed
//! - `Value`: Runtime values exchanged with function plugins
//! - `StatsError`: Typed engine errors
//! - `ShewhartError`: Structured errors for tool clients

mod error;
mod sample;
mod value;

pub use error::{codes, Severity, ShewhartError, StatsError};
pub use sample::{GroupedInterval, Sample, MAX_SAMPLE_LEN};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{GroupedInterval, Sample, Severity, ShewhartError, StatsError, Value};
}
