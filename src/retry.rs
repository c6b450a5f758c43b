use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed-delay retry policy applied around network calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(10),
        }
    }
}

/// Error returned once every attempt has failed
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `operation` until it succeeds or `max_attempts` calls have failed.
    ///
    /// The last error is handed back to the caller together with the number of
    /// attempts made. No sleep happens after the final failure.
    pub async fn run<F, Fut, T, E>(
        &self,
        operation_name: &str,
        mut operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            match operation().await {
                Ok(result) => {
                    if attempts > 1 {
                        debug!("{} succeeded on attempt {}", operation_name, attempts);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    if attempts >= max_attempts {
                        warn!(
                            "{} failed after {} attempt(s): {}",
                            operation_name, attempts, e
                        );
                        return Err(RetryExhausted {
                            attempts,
                            last_error: e,
                        });
                    }

                    warn!(
                        "Retrying {} due to error: {}. Attempt {} of {}. Retrying in {:?}...",
                        operation_name, e, attempts, max_attempts, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
