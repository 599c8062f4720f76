use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "barrage",
    version,
    about = "Minimal HTTP GET load tester: send a fixed number of requests with bounded concurrency and report latency, time-to-first-byte, and outcome counts."
)]
pub struct TesterArgs {
    /// Target URL to load test
    #[arg(long, short)]
    pub url: Option<String>,

    /// Total number of requests to send
    #[arg(long, short = 'n', default_value_t = 1)]
    pub requests: usize,

    /// Maximum number of concurrent requests (1 runs sequentially)
    #[arg(
        long,
        short = 'c',
        alias = "concurrency",
        default_value = "1",
        value_parser = parse_positive_usize
    )]
    pub concurrent: PositiveUsize,

    /// Per-request deadline (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables redirects)
    #[arg(long = "redirect", default_value_t = 10)]
    pub redirect_limit: u32,

    /// Open a new connection for every request
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Report format printed after the run
    #[arg(long = "output-format", short = 'o', default_value = "text", ignore_case = true)]
    pub output_format: OutputFormat,

    /// Print the status code of every response after the run (to stderr with json output)
    #[arg(long)]
    pub display: bool,

    /// Write the summary and every response to a JSON file
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Write every response to a CSV file
    #[arg(long = "export-csv")]
    pub export_csv: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by BARRAGE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./barrage.toml or ./barrage.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
