pub mod loader;
pub mod models;

pub use loader::{load_config, load_config_or_default};
pub use models::{
    ClientConfig, Config, HeaderConfig, LogFormat, LoggingConfig, RetryConfig, DEFAULT_MODEL,
};
