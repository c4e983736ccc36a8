//! Bounded retry with a fixed politeness delay

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use super::error::ScrapeError;
use crate::utils::logging;

/// Result of a single attempt
#[derive(Debug)]
pub enum Attempt<T> {
    /// Good result, stop
    Complete(T),
    /// Usable but suspicious result; retried while budget remains, then accepted
    Incomplete(T, ScrapeError),
    /// Hard failure; retried while budget remains, then surfaced
    Failed(ScrapeError),
}

/// Runs an operation up to `max_retries + 1` times, sleeping `delay` before each attempt
#[derive(Debug, Clone)]
pub struct RetryHandler {
    max_retries: u32,
    delay: Duration,
}

impl RetryHandler {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Execute an operation with retry logic
    ///
    /// `label` identifies the operation in logs and in the terminal error.
    pub async fn execute<F, Fut, T>(&self, label: &str, operation: F) -> Result<T, ScrapeError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Attempt<T>>,
    {
        let mut attempt = 0;

        loop {
            sleep(self.delay).await;

            match operation().await {
                Attempt::Complete(result) => {
                    if attempt > 0 {
                        logging::log_debug(&format!(
                            "{} succeeded after {} retries",
                            label, attempt
                        ));
                    }
                    return Ok(result);
                }
                Attempt::Incomplete(result, reason) => {
                    if attempt >= self.max_retries {
                        logging::log_warning(&format!(
                            "{} still incomplete after {} attempts ({}), keeping partial page",
                            label,
                            attempt + 1,
                            reason
                        ));
                        return Ok(result);
                    }
                    attempt += 1;
                    logging::log_warning(&format!(
                        "{} incomplete (attempt {}/{}): {}. Retrying in {}ms",
                        label,
                        attempt,
                        self.max_retries,
                        reason,
                        self.delay.as_millis()
                    ));
                }
                Attempt::Failed(e) => {
                    if attempt >= self.max_retries {
                        logging::log_error(&format!(
                            "{} failed after {} attempts: {}",
                            label,
                            attempt + 1,
                            e
                        ));
                        return Err(ScrapeError::RetriesExhausted {
                            url: label.to_string(),
                            attempts: attempt + 1,
                            last: Box::new(e),
                        });
                    }
                    attempt += 1;
                    logging::log_warning(&format!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms",
                        label,
                        attempt,
                        self.max_retries,
                        e,
                        self.delay.as_millis()
                    ));
                }
            }
        }
    }
}
