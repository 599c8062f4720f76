use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::metrics::{RunStatistics, TimedResult};

/// Upper bound on the response log reserved before the first result arrives.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Sole owner of the statistics and response log of a run.
#[derive(Debug, Clone)]
pub struct Aggregator {
    stats: RunStatistics,
    responses: Vec<TimedResult>,
}

impl Aggregator {
    /// Reserves room for up to `expected` results; larger runs grow the log
    /// as results arrive.
    #[must_use]
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            stats: RunStatistics::new(),
            responses: Vec::with_capacity(expected.min(PREALLOC_LIMIT)),
        }
    }

    /// Classifies one result, folds it into the statistics, and logs it.
    pub fn record(&mut self, result: TimedResult) {
        let group = self.stats.fold(&result);
        trace!(
            "Recorded status {} ({}) in {:?}",
            result.status_code, group, result.duration
        );
        self.responses.push(result);
    }

    #[must_use]
    pub fn into_parts(self) -> (RunStatistics, Vec<TimedResult>) {
        (self.stats, self.responses)
    }
}

/// Spawns the single consumer of the result queue.
///
/// The receiver is moved into the task, so no other consumer can exist. The
/// task finishes once every sender is dropped and the queue is drained.
pub(super) fn spawn_aggregator(
    mut results_rx: mpsc::Receiver<TimedResult>,
    capacity: usize,
) -> JoinHandle<Aggregator> {
    tokio::spawn(async move {
        let mut aggregator = Aggregator::with_capacity(capacity);
        while let Some(result) = results_rx.recv().await {
            aggregator.record(result);
        }
        aggregator
    })
}
