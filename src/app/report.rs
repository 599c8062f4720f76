use std::time::Duration;

use crate::metrics::{LatencyStats, OutcomeGroup, Summary, TimedResult};

/// Microseconds per millisecond.
const US_PER_MS: u128 = 1_000;

/// Human-readable report of a finished run, one line per entry.
pub(crate) fn summary_lines(summary: &Summary, target: &str, concurrency: usize) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Target: {}", target));
    lines.push(format!("Concurrency: {}", concurrency));
    lines.push(format!(
        "Execution Time: {}",
        format_ms(summary.execution_time)
    ));
    lines.push(format!("Total Requests: {}", summary.total_requests));
    lines.push(format!("Failed Requests: {}", summary.failed_requests));
    for group in OutcomeGroup::ALL {
        let count = summary.count(group);
        if count > 0 {
            lines.push(format!("  {}: {}", group, count));
        }
    }
    lines.push(format!(
        "Total Request Time: {}",
        format_ms(summary.total_duration)
    ));
    lines.push(format!(
        "Requests/sec: {:.2} (wall clock: {:.2})",
        summary.requests_per_second, summary.wall_clock_rps
    ));
    lines.push(latency_line("Latency", &summary.duration));
    lines.push(latency_line("Time To First Byte", &summary.time_to_first_byte));
    lines.push(format!(
        "P50/P90/P99 Latency: {} / {} / {}",
        format_ms(summary.percentiles.p50),
        format_ms(summary.percentiles.p90),
        format_ms(summary.percentiles.p99)
    ));
    lines
}

fn latency_line(label: &str, stats: &LatencyStats) -> String {
    format!(
        "{} (min/mean/max): {} / {} / {}",
        label,
        format_ms(stats.min),
        format_ms(stats.mean),
        format_ms(stats.max)
    )
}

/// Status code of every response, in the order results were aggregated.
pub(crate) fn display_lines(responses: &[TimedResult]) -> Vec<String> {
    responses
        .iter()
        .enumerate()
        .map(|(index, response)| {
            format!(
                "#{} status={} ({}) duration={} ttfb={}",
                index.saturating_add(1),
                response.status_code,
                response.outcome(),
                format_ms(response.duration),
                format_ms(response.time_to_first_byte)
            )
        })
        .collect()
}

pub(crate) fn summary_json(summary: &Summary) -> serde_json::Value {
    let outcomes: serde_json::Map<String, serde_json::Value> = OutcomeGroup::ALL
        .iter()
        .map(|group| (group.as_str().to_owned(), summary.count(*group).into()))
        .collect();

    serde_json::json!({
        "total_requests": summary.total_requests,
        "failed_requests": summary.failed_requests,
        "outcomes": outcomes,
        "execution_time_us": micros(summary.execution_time),
        "total_duration_us": micros(summary.total_duration),
        "requests_per_second": summary.requests_per_second,
        "wall_clock_rps": summary.wall_clock_rps,
        "duration_us": latency_json(&summary.duration),
        "time_to_first_byte_us": latency_json(&summary.time_to_first_byte),
        "p50_us": micros(summary.percentiles.p50),
        "p90_us": micros(summary.percentiles.p90),
        "p99_us": micros(summary.percentiles.p99)
    })
}

fn latency_json(stats: &LatencyStats) -> serde_json::Value {
    serde_json::json!({
        "min": micros(stats.min),
        "mean": micros(stats.mean),
        "max": micros(stats.max)
    })
}

pub(crate) fn micros(value: Duration) -> u64 {
    u64::try_from(value.as_micros()).unwrap_or(u64::MAX)
}

/// Formats a duration as milliseconds with microsecond precision.
pub(crate) fn format_ms(value: Duration) -> String {
    let us = value.as_micros();
    format!(
        "{}.{:03}ms",
        us.checked_div(US_PER_MS).unwrap_or(0),
        us.checked_rem(US_PER_MS).unwrap_or(0)
    )
}
