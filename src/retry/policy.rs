use super::backoff::Backoff;
use crate::config::RetryConfig;
use crate::types::ToolError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use tokio::time::sleep;

/// Decides whether a failed attempt may be retried.
pub trait RetryClassifier<E: ?Sized> {
    fn is_retryable(&self, error: &E) -> bool;
}

impl<E: ?Sized, F> RetryClassifier<E> for F
where
    F: Fn(&E) -> bool,
{
    fn is_retryable(&self, error: &E) -> bool {
        self(error)
    }
}

/// Built-in retry classifications for [`ToolError`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RetryOn {
    /// Transport, timeout, HTTP status, decoding and invalid-value failures.
    #[default]
    Standard,
    /// Timeouts, connection failures and transient HTTP statuses only.
    Transient,
    /// Every failure.
    Any,
}

impl RetryClassifier<ToolError> for RetryOn {
    fn is_retryable(&self, error: &ToolError) -> bool {
        match self {
            RetryOn::Standard => is_retryable(error),
            RetryOn::Transient => is_transient(error),
            RetryOn::Any => true,
        }
    }
}

pub fn is_retryable(error: &ToolError) -> bool {
    matches!(
        error,
        ToolError::Timeout
            | ToolError::Http(_)
            | ToolError::Upstream { .. }
            | ToolError::Json(_)
            | ToolError::MalformedResponse(_)
            | ToolError::InvalidValue(_)
    )
}

pub fn is_transient(error: &ToolError) -> bool {
    match error {
        ToolError::Timeout => true,
        ToolError::Http(e) if e.is_timeout() || e.is_connect() || e.is_request() => true,
        _ => error.status().is_some_and(is_transient_status),
    }
}

fn is_transient_status(status: u16) -> bool {
    matches!(
        status,
        408 | // Request Timeout
        429 | // Too Many Requests
        500 | // Internal Server Error
        502 | // Bad Gateway
        503 | // Service Unavailable
        504   // Gateway Timeout
    )
}

/// Run `operation` until it succeeds, fails with an error `classifier`
/// rejects, or `config.max_retries` retries have been spent.
///
/// The last error is returned unchanged once retries are exhausted. With
/// `max_retries == 0` the operation runs exactly once and never sleeps.
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    config: &RetryConfig,
    classifier: &C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    C: RetryClassifier<E> + ?Sized,
{
    let mut backoff = Backoff::new(config);
    let mut retries: u32 = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !classifier.is_retryable(&e) {
                    tracing::debug!(
                        error = %e,
                        "Error is not retryable"
                    );
                    return Err(e);
                }

                retries += 1;
                if retries > config.max_retries {
                    tracing::error!(
                        max_retries = config.max_retries,
                        error = %e,
                        "Max retries exceeded"
                    );
                    return Err(e);
                }

                let delay = backoff.next_delay();
                tracing::warn!(
                    attempt = retries,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );

                sleep(delay).await;
            }
        }
    }
}
