//! Generic retry-with-exponential-backoff helper
//!
//! Every upstream call in the pipeline goes through this one wrapper
//! instead of ad hoc loops at each call site. The caller supplies the
//! operation, a retryable-error predicate, the attempt cap, and the base
//! delay; backoff is `base * 2^(attempt-1)` plus a small random jitter to
//! avoid thundering-herd retries against the same endpoint.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};

/// Maximum jitter added to each backoff wait
const JITTER_MS: u64 = 50;

/// Run `op` until it succeeds, a non-retryable error occurs, or
/// `max_attempts` is exhausted.
///
/// Only errors matching `is_retryable` are retried; anything else is
/// surfaced immediately. On exhaustion the last error is returned.
pub async fn retry_with_backoff<T, F, Fut, P>(
    op: F,
    is_retryable: P,
    max_attempts: u32,
    base_delay: Duration,
) -> AppResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = AppResult<T>>,
    P: Fn(&AppError) -> bool,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) && attempt < max_attempts => {
                let wait = backoff_delay(base_delay, attempt);
                warn!(
                    "⏳ {} - retrying in {}ms (attempt {}/{})",
                    err.code_str(),
                    wait.as_millis(),
                    attempt,
                    max_attempts
                );
                tokio::time::sleep(wait).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Exponential backoff: base, 2*base, 4*base... with random jitter.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exp = base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);
    exp + Duration::from_millis(jitter)
}
