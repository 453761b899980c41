//! Retry utilities for the search provider.
//!
//! Only HTTP 429 responses and network-level failures are retried. Anything
//! else (bot-check pages, other non-2xx statuses) is surfaced immediately so
//! the resolver can move on without burning its time budget.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Returns `true` if `err` is a transient condition worth a backoff retry.
fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::RateLimited { .. } => true,
        SearchError::Http(e) => e.is_timeout() || e.is_connect(),
        SearchError::Unavailable(_) => false,
    }
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// or the provider's `Retry-After` hint when that is longer. With
/// `max_retries = 1` the operation is attempted at most twice.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
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

        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let SearchError::RateLimited { retry_after_secs } = &err {
            delay_secs = delay_secs.max(*retry_after_secs);
        }
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient search error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
