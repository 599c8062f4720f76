//! Core library for the `barrage` CLI.
//!
//! `barrage` sends a fixed number of HTTP GET requests to one target with a
//! bounded number of concurrent workers, folds every timed result into running
//! statistics, and reports latency, time-to-first-byte, and outcome counts.
//! The [`fetcher`] module holds the dispatch engine; the remaining modules
//! cover CLI arguments, configuration files, transport, and metrics.
pub mod args;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logger;
pub mod metrics;

mod app;
mod entry;

pub use entry::run;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
