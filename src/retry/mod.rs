pub mod backoff;
pub mod policy;

pub use backoff::Backoff;
pub use policy::{is_retryable, is_transient, retry_with_backoff, RetryClassifier, RetryOn};
