//! Exponential backoff retry logic for provider calls.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::warn;

use crate::error::LlmError;

use super::client::{CompletionRequest, NotesExecutor};

/// Configuration: 3 total attempts, base 2s, max 30s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 2;
const MAX_INTERVAL_SECS: u64 = 30;

/// Retry an async operation with exponential backoff.
///
/// `attempt` is called up to `MAX_ATTEMPTS` times. Errors for which
/// `is_transient` returns false are returned immediately. Otherwise the task
/// sleeps for an exponentially increasing duration before the next attempt.
///
/// `wrap_exhausted` converts the last error into the appropriate
/// `RetriesExhausted` variant for the caller's error type.
pub async fn retry_with_backoff<T, E, Fut, F, P, W>(
    mut attempt: F,
    is_transient: P,
    wrap_exhausted: W,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    W: FnOnce(E) -> E,
    E: std::fmt::Display,
{
    let mut backoff = ExponentialBackoff {
        initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
        max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempts = 0;

    loop {
        attempts += 1;

        let e = match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !is_transient(&e) {
            return Err(e);
        }

        if attempts >= MAX_ATTEMPTS {
            return Err(wrap_exhausted(e));
        }

        warn!("Attempt {}/{} failed: {}. Retrying.", attempts, MAX_ATTEMPTS, e);
        if let Some(wait_duration) = backoff.next_backoff() {
            tokio::time::sleep(wait_duration).await;
        }
    }
}

/// Send a completion request, retrying transient failures.
pub async fn complete_with_retry<E: NotesExecutor + ?Sized>(
    request: &CompletionRequest,
    executor: &E,
) -> Result<String, LlmError> {
    retry_with_backoff(
        || async { executor.complete(request).await },
        LlmError::is_transient,
        |e| LlmError::RetriesExhausted(Box::new(e)),
    )
    .await
}
