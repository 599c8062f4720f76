use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Url};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::metrics::TimedResult;

/// Performs one timed GET against the target.
///
/// Implementations never fail: transport errors are folded into a
/// [`TimedResult`] with the unknown status so they still count.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends one GET and measures it.
    ///
    /// `duration` spans send to fully drained body. `time_to_first_byte` is
    /// taken once the status line and headers have been parsed, since the
    /// client exposes no earlier first-byte hook; it never exceeds
    /// `duration`. A request that fails before headers arrive reports the
    /// elapsed time for both.
    async fn execute(&self, target: &Url) -> TimedResult;
}

/// Executor backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, target: &Url) -> TimedResult {
        let start = Instant::now();
        let response = match self.client.get(target.clone()).send().await {
            Ok(response) => response,
            Err(err) => {
                let elapsed = start.elapsed();
                if err.is_timeout() {
                    warn!("Request to {} timed out after {:?}: {}", target, elapsed, err);
                } else {
                    warn!("Request to {} failed: {}", target, err);
                }
                return TimedResult::failed(elapsed);
            }
        };
        // `send` resolves once the status line and headers have been read.
        let time_to_first_byte = start.elapsed();
        let status_code = response.status().as_u16();

        match drain_response_body(response).await {
            Ok(bytes) => debug!("Drained {} body bytes (status {})", bytes, status_code),
            Err(err) => warn!("Failed to read response body from {}: {}", target, err),
        }

        TimedResult::new(status_code, start.elapsed(), time_to_first_byte)
    }
}

/// Reads the body to completion so the connection returns to the pool.
async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
