//! Bounded retry with a fixed delay between attempts.
//!
//! The journey API occasionally answers with an error status or a
//! truncated payload that succeeds on the next try. `with_retry` runs an
//! operation up to `max_attempts` times, sleeping `delay` between tries,
//! as long as the failures are transient.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Default number of attempts (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Errors that know whether a retry may help.
pub trait Retryable {
    /// Returns true if a later attempt may succeed.
    fn is_transient(&self) -> bool;
}

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included (at least 1)
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is raised to 1 if zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retries.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a transient error; holds the last one.
    Exhausted { attempts: u32, last: E },
    /// An attempt failed with an error that retrying cannot fix.
    Permanent(E),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
            RetryError::Permanent(e) => write!(f, "{e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Run `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent.
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "operation succeeded after retries");
                }
                return Ok(value);
            }
            Err(err) if !err.is_transient() => {
                debug!(attempts, error = %err, "operation failed permanently");
                return Err(RetryError::Permanent(err));
            }
            Err(err) if attempts >= max_attempts => {
                warn!(attempts, error = %err, "operation failed, attempts exhausted");
                return Err(RetryError::Exhausted { attempts, last: err });
            }
            Err(err) => {
                warn!(
                    attempt = attempts,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %err,
                    "operation failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
