//! Bounded retry with exponential backoff for control-plane reads.

use std::future::Future;

use crate::domain::{ControlPlaneError, RetryPolicy};

/// Runs `op` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made.
///
/// Only use this for idempotent calls; deletes are never retried.
///
/// # Errors
///
/// Returns the last error seen.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, ControlPlaneError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ControlPlaneError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "retrying control-plane call",
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
