use crate::ClientError;

use gsb_config::RetryConfig;

use std::time::Duration;

use tokio::time::sleep;

/// Errors that know whether the failed operation may be attempted again
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for ClientError {
    fn is_retryable(&self) -> bool {
        ClientError::is_retryable(self)
    }
}

/// Run an idempotent async operation, retrying transient failures with
/// exponential backoff.
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsRetryable,
{
    let mut attempts = 0;
    let mut delay = config.initial_delay();

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    log::info!("{operation_name} succeeded after {attempts} attempts");
                }
                return Ok(result);
            }
            Err(e) => {
                if !e.is_retryable() || attempts >= config.max_attempts {
                    log::warn!("{operation_name} failed after {attempts} attempts: {e}");
                    return Err(e);
                }

                let actual_delay = if config.jitter {
                    let jitter_factor = 0.5 + rand::random::<f64>();
                    delay.mul_f64(jitter_factor)
                } else {
                    delay
                };

                log::debug!(
                    "{operation_name} attempt {attempts} failed: {e}. Retrying in {actual_delay:?}"
                );

                sleep(actual_delay).await;

                delay = next_delay(delay, config);
            }
        }
    }
}

fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    current
        .mul_f64(config.backoff_multiplier)
        .min(config.max_delay())
}
