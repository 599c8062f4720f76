use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Status code recorded when a request never produced a response.
pub const UNKNOWN_STATUS: u16 = 0;

/// Outcome of a single GET request as seen by the executor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedResult {
    pub status_code: u16,
    pub duration: Duration,
    pub time_to_first_byte: Duration,
}

impl TimedResult {
    #[must_use]
    pub const fn new(status_code: u16, duration: Duration, time_to_first_byte: Duration) -> Self {
        Self {
            status_code,
            duration,
            time_to_first_byte,
        }
    }

    /// A request that failed before a response head arrived. No first byte
    /// was observed, so time-to-first-byte degrades to the elapsed duration.
    #[must_use]
    pub const fn failed(elapsed: Duration) -> Self {
        Self {
            status_code: UNKNOWN_STATUS,
            duration: elapsed,
            time_to_first_byte: elapsed,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> OutcomeGroup {
        OutcomeGroup::classify(i64::from(self.status_code))
    }
}

/// Status code family of a response, plus a catch-all for failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeGroup {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
    Unknown,
}

impl OutcomeGroup {
    pub const ALL: [OutcomeGroup; 6] = [
        OutcomeGroup::Informational,
        OutcomeGroup::Successful,
        OutcomeGroup::Redirection,
        OutcomeGroup::ClientError,
        OutcomeGroup::ServerError,
        OutcomeGroup::Unknown,
    ];

    /// Maps any integer status code to its group. Codes outside `100..=599`,
    /// including the `0` failure sentinel, are `Unknown`.
    #[must_use]
    pub const fn classify(code: i64) -> Self {
        match code {
            100..=199 => OutcomeGroup::Informational,
            200..=299 => OutcomeGroup::Successful,
            300..=399 => OutcomeGroup::Redirection,
            400..=499 => OutcomeGroup::ClientError,
            500..=599 => OutcomeGroup::ServerError,
            _ => OutcomeGroup::Unknown,
        }
    }

    /// Client errors, server errors and transport failures count as failed.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(
            self,
            OutcomeGroup::ClientError | OutcomeGroup::ServerError | OutcomeGroup::Unknown
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeGroup::Informational => "1xx",
            OutcomeGroup::Successful => "2xx",
            OutcomeGroup::Redirection => "3xx",
            OutcomeGroup::ClientError => "4xx",
            OutcomeGroup::ServerError => "5xx",
            OutcomeGroup::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OutcomeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
