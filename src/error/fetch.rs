use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Run has not completed (state: {state}); summary is unavailable.")]
    NotCompleted { state: &'static str },
    #[error("Run was already started (state: {state}); a fetcher runs exactly once.")]
    AlreadyStarted { state: &'static str },
    #[error("Task queue closed after {dispatched} of {quantity} tasks; all workers exited early.")]
    TaskQueueClosed { dispatched: usize, quantity: usize },
}
