use std::sync::Arc;

use reqwest::Url;
use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, FetchError};
use crate::http::RequestExecutor;
use crate::metrics::TimedResult;

use super::aggregator::{Aggregator, spawn_aggregator};

/// One unit of work: a single GET against the run target.
#[derive(Debug, Clone, Copy)]
struct Task {
    index: usize,
}

type SharedTasks = Arc<Mutex<mpsc::Receiver<Task>>>;

/// Runs `quantity` requests on exactly `workers` concurrent executors and
/// returns the aggregated results.
///
/// The task queue holds at most `workers` pending tokens, so submission is
/// throttled by the queue itself. The result queue can hold every result, up
/// to the channel's permit limit.
pub(super) async fn run_pool<E>(
    executor: &Arc<E>,
    target: &Url,
    quantity: usize,
    workers: usize,
) -> AppResult<Aggregator>
where
    E: RequestExecutor + ?Sized + 'static,
{
    let (task_tx, task_rx) = mpsc::channel::<Task>(workers.max(1));
    let (results_tx, results_rx) =
        mpsc::channel::<TimedResult>(quantity.clamp(1, Semaphore::MAX_PERMITS));

    let aggregator = spawn_aggregator(results_rx, quantity);
    let target = Arc::new(target.clone());

    let tasks: SharedTasks = Arc::new(Mutex::new(task_rx));
    let mut worker_handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        worker_handles.push(spawn_worker(
            worker_id,
            Arc::clone(&tasks),
            results_tx.clone(),
            Arc::clone(executor),
            Arc::clone(&target),
        ));
    }
    // Workers hold the only remaining senders; the result queue closes when
    // the last of them exits.
    drop(results_tx);

    let mut dispatched: usize = 0;
    for index in 0..quantity {
        if task_tx.send(Task { index }).await.is_err() {
            break;
        }
        dispatched = dispatched.saturating_add(1);
    }
    drop(task_tx);

    for handle in worker_handles {
        handle.await?;
    }
    let aggregator = aggregator.await?;

    if dispatched < quantity {
        return Err(AppError::fetch(FetchError::TaskQueueClosed {
            dispatched,
            quantity,
        }));
    }

    Ok(aggregator)
}

fn spawn_worker<E>(
    worker_id: usize,
    tasks: SharedTasks,
    results_tx: mpsc::Sender<TimedResult>,
    executor: Arc<E>,
    target: Arc<Url>,
) -> JoinHandle<()>
where
    E: RequestExecutor + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut completed: u64 = 0;
        loop {
            let next = {
                let mut queue = tasks.lock().await;
                queue.recv().await
            };
            let Some(task) = next else {
                break;
            };

            let result = executor.execute(&target).await;
            if results_tx.send(result).await.is_err() {
                warn!(
                    "Worker {} dropped result of task {}: result queue closed.",
                    worker_id, task.index
                );
                break;
            }
            completed = completed.saturating_add(1);
        }
        debug!("Worker {} finished after {} requests", worker_id, completed);
    })
}
