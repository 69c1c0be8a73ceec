//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::{AgentryError, Result};

/// Wrap a future with a timeout.
///
/// Useful for bounding
/// [`await_completion`](crate::monitor::RunMonitor::await_completion) when
/// no [`PollOptions`](crate::monitor::PollOptions) deadline is set.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AgentryError::Timeout(duration.as_millis() as u64)),
    }
}
