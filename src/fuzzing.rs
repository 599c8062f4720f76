use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::{PositiveUsize, TesterArgs, parsers::parse_duration_arg};
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, ConfigError};
use crate::http::parse_target;
use crate::metrics::{OutcomeGroup, RunStatistics, Summary, TimedResult};

thread_local! {
    static BASE_MATCHES: ArgMatches = TesterArgs::command().get_matches_from(["barrage"]);
}

const FUZZ_INPUT: &str = "<fuzz input>";

#[must_use]
pub const fn classify_status_input(code: i64) -> OutcomeGroup {
    OutcomeGroup::classify(code)
}

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input).map_err(AppError::from)
}

/// Parses a positive worker count.
///
/// # Errors
///
/// Returns an error when the value is invalid or zero.
pub fn parse_positive_usize_input(input: &str) -> AppResult<usize> {
    let value: PositiveUsize = input.parse()?;
    Ok(value.get())
}

/// Parses a target URL.
///
/// # Errors
///
/// Returns an error when the URL is malformed or not http(s).
pub fn parse_target_input(input: &str) -> AppResult<String> {
    Ok(parse_target(input)?.to_string())
}

/// Parses TOML config and applies it to default arguments.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<TesterArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| ConfigError::ParseToml {
        path: PathBuf::from(FUZZ_INPUT),
        source: err,
    })?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to default arguments.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<TesterArgs> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<TesterArgs> {
    BASE_MATCHES.with(|matches| {
        let mut args = TesterArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        Ok(args)
    })
}

/// Folds `(status, duration_us, ttfb_us)` triples and summarizes them.
#[must_use]
pub fn summarize_results(samples: &[(u16, u64, u64)]) -> Summary {
    let responses: Vec<TimedResult> = samples
        .iter()
        .map(|(status, duration_us, ttfb_us)| {
            TimedResult::new(
                *status,
                Duration::from_micros(*duration_us),
                Duration::from_micros(*ttfb_us),
            )
        })
        .collect();
    let mut stats = RunStatistics::new();
    for response in &responses {
        stats.fold(response);
    }
    Summary::compute(&stats, &responses, Duration::ZERO)
}
