use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use super::histogram::{LatencyHistogram, Percentiles};
use super::types::{OutcomeGroup, TimedResult};

/// Running minimum and maximum of a duration series.
///
/// Starts unset; the first observed value seeds both bounds, so a genuine
/// zero duration is never confused with "nothing observed yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extrema {
    bounds: Option<(Duration, Duration)>,
}

impl Extrema {
    pub fn observe(&mut self, value: Duration) {
        self.bounds = Some(match self.bounds {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }

    #[must_use]
    pub const fn min(&self) -> Option<Duration> {
        match self.bounds {
            Some((min, _)) => Some(min),
            None => None,
        }
    }

    #[must_use]
    pub const fn max(&self) -> Option<Duration> {
        match self.bounds {
            Some((_, max)) => Some(max),
            None => None,
        }
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.bounds.is_some()
    }
}

/// Statistics folded from every timed result of a run.
///
/// Mutated by exactly one owner while the run is active.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    outcomes: BTreeMap<OutcomeGroup, u64>,
    duration: Extrema,
    time_to_first_byte: Extrema,
    histogram: Option<LatencyHistogram>,
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStatistics {
    #[must_use]
    pub fn new() -> Self {
        let histogram = match LatencyHistogram::new() {
            Ok(histogram) => Some(histogram),
            Err(err) => {
                warn!("Failed to initialize latency histogram: {}", err);
                None
            }
        };

        Self {
            outcomes: BTreeMap::new(),
            duration: Extrema::default(),
            time_to_first_byte: Extrema::default(),
            histogram,
        }
    }

    /// Classifies the result and folds it into the counters and extrema.
    pub fn fold(&mut self, result: &TimedResult) -> OutcomeGroup {
        let group = result.outcome();
        let count = self.outcomes.entry(group).or_insert(0);
        *count = count.saturating_add(1);

        self.duration.observe(result.duration);
        self.time_to_first_byte.observe(result.time_to_first_byte);

        if let Some(histogram) = self.histogram.as_mut()
            && let Err(err) = histogram.record(result.duration)
        {
            warn!("Dropping latency from percentile histogram: {}", err);
        }

        group
    }

    #[must_use]
    pub fn count(&self, group: OutcomeGroup) -> u64 {
        self.outcomes.get(&group).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn outcomes(&self) -> &BTreeMap<OutcomeGroup, u64> {
        &self.outcomes
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.outcomes
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    #[must_use]
    pub fn failed(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(group, _)| group.is_failure())
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count))
    }

    #[must_use]
    pub const fn duration(&self) -> &Extrema {
        &self.duration
    }

    #[must_use]
    pub const fn time_to_first_byte(&self) -> &Extrema {
        &self.time_to_first_byte
    }

    #[must_use]
    pub fn percentiles(&self) -> Percentiles {
        self.histogram
            .as_ref()
            .map(LatencyHistogram::percentiles)
            .unwrap_or_default()
    }
}
