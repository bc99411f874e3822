//! Bounded retry with exponential backoff.
//!
//! The portal client itself never retries; the orchestrator opts in per run
//! by wrapping each extractor call. Only transport failures and server-side
//! statuses are retried. Data and protocol errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`ScraperError::Request`] (network failure) and
/// [`ScraperError::Status`] with 429 or any 5xx.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Request(_) => true,
        ScraperError::Status { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds.
/// With `max_retries = 0` the first error is returned as-is.
///
/// # Errors
///
/// Returns the first non-retriable error, or the last error once retries are
/// exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient portal error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
