use std::collections::BTreeMap;
use std::time::Duration;

use super::histogram::Percentiles;
use super::stats::{Extrema, RunStatistics};
use super::types::{OutcomeGroup, TimedResult};

/// Min, max and mean of one latency series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyStats {
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
}

impl LatencyStats {
    fn from_parts(extrema: &Extrema, total: Duration, count: u64) -> Self {
        Self {
            min: extrema.min().unwrap_or_default(),
            max: extrema.max().unwrap_or_default(),
            mean: mean_duration(total, count),
        }
    }
}

/// Immutable report of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub outcomes: BTreeMap<OutcomeGroup, u64>,
    /// Sum of every per-request duration.
    pub total_duration: Duration,
    /// Requests divided by the accumulated per-request duration.
    pub requests_per_second: f64,
    pub execution_time: Duration,
    /// Requests divided by wall-clock execution time.
    pub wall_clock_rps: f64,
    pub duration: LatencyStats,
    pub time_to_first_byte: LatencyStats,
    pub percentiles: Percentiles,
}

impl Summary {
    /// Derives the report from the frozen state of a run.
    ///
    /// A run without completed requests yields zero-valued rates and means.
    #[must_use]
    pub fn compute(
        stats: &RunStatistics,
        responses: &[TimedResult],
        execution_time: Duration,
    ) -> Self {
        let total_requests = u64::try_from(responses.len()).unwrap_or(u64::MAX);
        let (total_duration, total_ttfb) = responses.iter().fold(
            (Duration::ZERO, Duration::ZERO),
            |(duration, ttfb), response| {
                (
                    duration.saturating_add(response.duration),
                    ttfb.saturating_add(response.time_to_first_byte),
                )
            },
        );

        Self {
            total_requests,
            failed_requests: stats.failed(),
            outcomes: stats.outcomes().clone(),
            total_duration,
            requests_per_second: rate(total_requests, total_duration),
            execution_time,
            wall_clock_rps: rate(total_requests, execution_time),
            duration: LatencyStats::from_parts(stats.duration(), total_duration, total_requests),
            time_to_first_byte: LatencyStats::from_parts(
                stats.time_to_first_byte(),
                total_ttfb,
                total_requests,
            ),
            percentiles: stats.percentiles(),
        }
    }

    #[must_use]
    pub fn count(&self, group: OutcomeGroup) -> u64 {
        self.outcomes.get(&group).copied().unwrap_or(0)
    }
}

pub(crate) fn mean_duration(total: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total
        .as_nanos()
        .checked_div(u128::from(count))
        .unwrap_or(0);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[expect(
    clippy::float_arithmetic,
    reason = "Throughput is reported as a fractional rate"
)]
pub(crate) fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if count == 0 || secs <= 0.0 {
        return 0.0;
    }
    count as f64 / secs
}
