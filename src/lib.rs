//! OpenRouter chat-completion tool with exponential-backoff retries.

pub mod client;
pub mod completion;
pub mod config;
pub mod logging;
pub mod retry;
pub mod tool;
pub mod types;

pub use completion::{get_model_response, CompletionParams};
pub use config::{Config, RetryConfig};
pub use retry::{retry_with_backoff, RetryClassifier, RetryOn};
pub use tool::{run, run_with_config, run_with_transport, RunArgs, ToolOutput};
pub use types::{Result, ToolError};
