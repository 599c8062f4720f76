//! Run orchestration: strategy selection, worker pool, and aggregation.
//!
//! A [`Fetcher`] owns one run. With a concurrency of one it issues requests
//! in a plain loop; otherwise it starts a bounded worker pool whose results
//! fan in to a single aggregator task. Statistics are only ever mutated by
//! that one consumer, so no lock guards them.
mod aggregator;
mod pool;


use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::args::PositiveUsize;
use crate::error::{AppError, AppResult, FetchError, ValidationError};
use crate::http::RequestExecutor;
use crate::metrics::{RunStatistics, Summary, TimedResult};

pub use aggregator::Aggregator;

/// Immutable parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    target: Url,
    quantity: usize,
    concurrency: PositiveUsize,
}

impl RunConfig {
    #[must_use]
    pub const fn new(target: Url, quantity: usize, concurrency: PositiveUsize) -> Self {
        Self {
            target,
            quantity,
            concurrency,
        }
    }

    /// Builds a config from a raw worker count.
    ///
    /// # Errors
    ///
    /// Returns an error when `concurrency` is zero.
    pub fn try_new(target: Url, quantity: usize, concurrency: usize) -> AppResult<Self> {
        let concurrency = PositiveUsize::try_from(concurrency)
            .ok()
            .ok_or_else(|| AppError::validation(ValidationError::ConcurrencyZero))?;
        Ok(Self::new(target, quantity, concurrency))
    }

    #[must_use]
    pub const fn target(&self) -> &Url {
        &self.target
    }

    #[must_use]
    pub const fn quantity(&self) -> usize {
        self.quantity
    }

    #[must_use]
    pub const fn concurrency(&self) -> PositiveUsize {
        self.concurrency
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        if self.concurrency.get() == 1 {
            Strategy::Sequential
        } else {
            Strategy::Concurrent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    Concurrent,
}

/// Frozen state of a finished run.
#[derive(Debug, Clone)]
struct CompletedRun {
    stats: RunStatistics,
    responses: Vec<TimedResult>,
    execution_time: Duration,
}

#[derive(Debug, Clone)]
enum RunState {
    Idle,
    Running,
    Completed(CompletedRun),
}

impl RunState {
    const fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed(_) => "completed",
        }
    }
}

/// Dispatches the requests of one run and exposes its summary.
pub struct Fetcher<E: RequestExecutor + ?Sized> {
    config: RunConfig,
    executor: Arc<E>,
    state: RunState,
}

impl<E> Fetcher<E>
where
    E: RequestExecutor + ?Sized + 'static,
{
    #[must_use]
    pub const fn new(config: RunConfig, executor: Arc<E>) -> Self {
        Self {
            config,
            executor,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.config.strategy()
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.state, RunState::Completed(_))
    }

    /// Issues every request of the run and waits for all results.
    ///
    /// # Errors
    ///
    /// Returns an error when the fetcher already ran, or when a worker or the
    /// aggregator task fails to join.
    pub async fn run(&mut self) -> AppResult<()> {
        if !matches!(self.state, RunState::Idle) {
            return Err(AppError::fetch(FetchError::AlreadyStarted {
                state: self.state.name(),
            }));
        }
        self.state = RunState::Running;

        let strategy = self.strategy();
        info!(
            "Sending {} requests to {} ({:?}, {} workers)",
            self.config.quantity,
            self.config.target,
            strategy,
            self.config.concurrency.get()
        );

        let start = Instant::now();
        let aggregator = match strategy {
            Strategy::Sequential => self.run_sequential().await,
            Strategy::Concurrent => {
                pool::run_pool(
                    &self.executor,
                    &self.config.target,
                    self.config.quantity,
                    self.config.concurrency.get(),
                )
                .await?
            }
        };
        let execution_time = start.elapsed();

        let (stats, responses) = aggregator.into_parts();
        debug!(
            "Run completed: {} responses in {:?}",
            responses.len(),
            execution_time
        );
        self.state = RunState::Completed(CompletedRun {
            stats,
            responses,
            execution_time,
        });
        Ok(())
    }

    async fn run_sequential(&self) -> Aggregator {
        let mut aggregator = Aggregator::with_capacity(self.config.quantity);
        for _ in 0..self.config.quantity {
            let result = self.executor.execute(&self.config.target).await;
            aggregator.record(result);
        }
        aggregator
    }

    fn completed(&self) -> Result<&CompletedRun, FetchError> {
        match &self.state {
            RunState::Completed(run) => Ok(run),
            state @ (RunState::Idle | RunState::Running) => Err(FetchError::NotCompleted {
                state: state.name(),
            }),
        }
    }

    /// Computes the summary of the finished run.
    ///
    /// # Errors
    ///
    /// Returns an error when the run has not completed.
    pub fn summary(&self) -> Result<Summary, FetchError> {
        let run = self.completed()?;
        Ok(Summary::compute(
            &run.stats,
            &run.responses,
            run.execution_time,
        ))
    }

    /// Every result in the order the aggregator received it.
    ///
    /// # Errors
    ///
    /// Returns an error when the run has not completed.
    pub fn responses(&self) -> Result<&[TimedResult], FetchError> {
        self.completed().map(|run| run.responses.as_slice())
    }

    /// # Errors
    ///
    /// Returns an error when the run has not completed.
    pub fn statistics(&self) -> Result<&RunStatistics, FetchError> {
        self.completed().map(|run| &run.stats)
    }

    /// Wall-clock time from the first dispatch to the last aggregated result.
    ///
    /// # Errors
    ///
    /// Returns an error when the run has not completed.
    pub fn execution_time(&self) -> Result<Duration, FetchError> {
        self.completed().map(|run| run.execution_time)
    }
}
