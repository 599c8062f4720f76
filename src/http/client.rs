use std::time::Duration;

use reqwest::{Client, Url, redirect};

use crate::args::{DEFAULT_USER_AGENT, TesterArgs};
use crate::error::{HttpError, ValidationError};

/// Transport options shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub redirect_limit: u32,
    pub disable_keepalive: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            redirect_limit: 10,
            disable_keepalive: false,
        }
    }
}

impl From<&TesterArgs> for ClientSettings {
    fn from(args: &TesterArgs) -> Self {
        Self {
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            redirect_limit: args.redirect_limit,
            disable_keepalive: args.disable_keepalive,
        }
    }
}

/// Builds the pooled HTTP client used by all executors of a run.
///
/// # Errors
///
/// Returns an error when the TLS backend or resolver cannot be initialised.
pub fn build_client(settings: &ClientSettings) -> Result<Client, HttpError> {
    let mut builder = Client::builder()
        .timeout(settings.request_timeout)
        .connect_timeout(settings.connect_timeout)
        .user_agent(DEFAULT_USER_AGENT);

    builder = if settings.redirect_limit == 0 {
        builder.redirect(redirect::Policy::none())
    } else {
        builder.redirect(redirect::Policy::limited(
            usize::try_from(settings.redirect_limit).unwrap_or(10),
        ))
    };

    if settings.disable_keepalive {
        builder = builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    builder
        .build()
        .map_err(|err| HttpError::BuildClientFailed { source: err })
}

/// Parses the target address, accepting only `http` and `https`.
///
/// # Errors
///
/// Returns an error when the URL is malformed or uses another scheme.
pub fn parse_target(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw.trim()).map_err(|err| ValidationError::InvalidUrl {
        url: raw.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}
