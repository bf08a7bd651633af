pub mod call_logger;

pub use call_logger::CallLogger;

use crate::config::{LogFormat, LoggingConfig};
use crate::types::{Result, ToolError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `config.level`.
/// Output goes to stderr so stdout carries only tool results.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    let json = config.format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .try_init()
        .map_err(|e| ToolError::Internal(format!("Failed to initialize tracing: {}", e)))
}

/// Subscriber for the window before [`init_tracing`] runs, such as loading
/// the config that configures it. `RUST_LOG` wins, otherwise warnings and up.
pub fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter("warn").into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn default_filter(level: &str) -> String {
    format!("openrouter_tool={}", level)
}
