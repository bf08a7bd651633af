use crate::retry::RetryOn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "nvidia/llama-3.1-nemotron-70b-instruct:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str =
    "https://registry.olas.network/ethereum/components/ENTER_MINTED_COMPONENT_NUMBER_HERE";
pub const DEFAULT_TITLE: &str = "Autonolas";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_model")]
    pub default_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            default_model: default_model(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub ssl_verify: bool,
    #[serde(default)]
    pub headers: HeaderConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            ssl_verify: true,
            headers: HeaderConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// Application identification headers sent with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_title")]
    pub title: String,
    /// Extra headers, added only when not already set.
    #[serde(default)]
    pub add: HashMap<String, String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            referer: default_referer(),
            title: default_title(),
            add: HashMap::new(),
        }
    }
}

fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub include_headers: bool,
    #[serde(default)]
    pub include_body: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_headers: false,
            include_body: false,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Backoff parameters. Delays are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay")]
    pub initial_delay: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_delay")]
    pub max_delay: f64,
    #[serde(default)]
    pub retry_on: RetryOn,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay: default_initial_delay(),
            multiplier: default_multiplier(),
            max_delay: default_max_delay(),
            retry_on: RetryOn::default(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay() -> f64 {
    1.0
}

fn default_multiplier() -> f64 {
    1.5
}

fn default_max_delay() -> f64 {
    60.0
}

impl RetryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_delay.is_finite() || self.initial_delay <= 0.0 {
            return Err(format!(
                "initial_delay must be a positive number of seconds (got {})",
                self.initial_delay
            ));
        }

        if !self.max_delay.is_finite() || self.max_delay <= 0.0 {
            return Err(format!(
                "max_delay must be a positive number of seconds (got {})",
                self.max_delay
            ));
        }

        if !self.multiplier.is_finite() || self.multiplier <= 1.0 {
            return Err(format!(
                "multiplier must be greater than 1 (got {})",
                self.multiplier
            ));
        }

        if self.initial_delay > self.max_delay {
            return Err(format!(
                "initial_delay ({}) must not exceed max_delay ({})",
                self.initial_delay, self.max_delay
            ));
        }

        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.client.base_url.is_empty() {
            return Err("client.base_url must not be empty".to_string());
        }

        if self.client.timeout_seconds == 0 {
            return Err("client.timeout_seconds must be > 0".to_string());
        }

        if self.default_model.is_empty() {
            return Err("default_model must not be empty".to_string());
        }

        self.retry.validate().map_err(|e| format!("retry: {}", e))
    }
}
