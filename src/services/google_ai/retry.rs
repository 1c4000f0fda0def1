use backoff::{backoff::Backoff, ExponentialBackoff};
use std::time::{Duration, Instant};

use super::errors::{GoogleAiError, RetryError};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
    pub total_timeout: Duration,
    pub ignore_server_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
            total_timeout: Duration::from_secs(300),
            ignore_server_retry_after: false,
        }
    }
}

impl RetryConfig {
    /// Build a config allowing `max_retries` retries after the first attempt
    pub fn with_retries(max_retries: usize) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            ..Default::default()
        }
    }

    /// A config that never retries
    pub fn none() -> Self {
        Self::with_retries(0)
    }

    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = timeout;
        self
    }
}

pub struct RetryHandler {
    config: RetryConfig,
    backoff: ExponentialBackoff,
    start_time: Instant,
    attempts: usize,
}

impl RetryHandler {
    pub fn new(config: RetryConfig) -> Self {
        let mut backoff = ExponentialBackoff {
            current_interval: config.initial_delay,
            initial_interval: config.initial_delay,
            max_interval: config.max_delay,
            multiplier: config.multiplier,
            max_elapsed_time: Some(config.total_timeout),
            ..Default::default()
        };

        if !config.jitter {
            backoff.randomization_factor = 0.0;
        }

        Self {
            config,
            backoff,
            start_time: Instant::now(),
            attempts: 0,
        }
    }

    pub async fn retry<F, Fut, T>(&mut self, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, GoogleAiError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);

        loop {
            self.attempts += 1;

            if self.start_time.elapsed() > self.config.total_timeout {
                return Err(RetryError::TimeoutExceeded);
            }

            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(RetryError::NonRetryable { source: error });
                    }

                    if self.attempts >= max_attempts {
                        return Err(RetryError::MaxAttemptsExceeded {
                            attempts: self.attempts,
                            source: error,
                        });
                    }

                    let server_delay = if self.config.ignore_server_retry_after {
                        None
                    } else {
                        error.retry_after()
                    };
                    let delay = server_delay.unwrap_or_else(|| {
                        self.backoff.next_backoff().unwrap_or(self.config.max_delay)
                    });

                    tracing::warn!(
                        attempt = self.attempts,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "Retryable Google AI error, backing off"
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

pub async fn with_retry<F, Fut, T>(config: RetryConfig, operation: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, GoogleAiError>>,
{
    let mut handler = RetryHandler::new(config);
    handler.retry(operation).await
}
