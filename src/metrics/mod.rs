//! Outcome classification, running statistics, and run summaries.
mod histogram;
mod stats;
mod summary;
mod types;


pub use histogram::{LatencyHistogram, Percentiles};
pub use stats::{Extrema, RunStatistics};
pub use summary::{LatencyStats, Summary};
pub use types::{OutcomeGroup, TimedResult, UNKNOWN_STATUS};
