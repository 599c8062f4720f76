//! HTTP transport: client construction and the timed GET executor.
mod client;
mod executor;

#[cfg(test)]
mod tests;

pub use client::{ClientSettings, build_client, parse_target};
pub use executor::{HttpExecutor, RequestExecutor};
