//! Entry point used by the surrounding tool framework.
//!
//! [`run`] never fails: every outcome is reported through the message of a
//! [`ToolOutput`]. The framework's calling convention is the four-tuple
//! `(message, prompt_used, transaction, cost)`; this tool only ever fills
//! the first slot.

use crate::client::{HttpTransport, Transport};
use crate::completion::{get_model_response, CompletionParams};
use crate::config::{Config, RetryConfig};
use crate::retry::retry_with_backoff;
use serde_json::Value;
use std::collections::HashMap;

pub const API_KEY_NAME: &str = "openrouter";
pub const NO_PROMPT_MESSAGE: &str = "No prompt has been specified.";
pub const NO_API_KEY_MESSAGE: &str = "No OpenRouter API key has been specified.";
pub const API_ERROR_PREFIX: &str = "Error while calling OpenRouter API: ";

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub prompt: Option<String>,
    pub api_keys: HashMap<String, String>,
    pub model: Option<String>,
    pub max_retries: Option<u32>,
    pub initial_delay: Option<f64>,
    pub retry_multiplier: Option<f64>,
    pub max_delay: Option<f64>,
    pub params: CompletionParams,
}

impl RunArgs {
    pub fn new(prompt: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut api_keys = HashMap::new();
        api_keys.insert(API_KEY_NAME.to_string(), api_key.into());
        Self {
            prompt: Some(prompt.into()),
            api_keys,
            ..Default::default()
        }
    }

    /// `base` with any per-call overrides applied.
    pub fn retry_config(&self, base: &RetryConfig) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries.unwrap_or(base.max_retries),
            initial_delay: self.initial_delay.unwrap_or(base.initial_delay),
            multiplier: self.retry_multiplier.unwrap_or(base.multiplier),
            max_delay: self.max_delay.unwrap_or(base.max_delay),
            retry_on: base.retry_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub message: String,
    /// Always `None` for this tool.
    pub prompt_used: Option<String>,
    /// Always `None` for this tool.
    pub transaction: Option<Value>,
    /// Always `None` for this tool.
    pub cost: Option<Value>,
}

impl ToolOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            prompt_used: None,
            transaction: None,
            cost: None,
        }
    }

    pub fn into_tuple(self) -> (String, Option<String>, Option<Value>, Option<Value>) {
        (self.message, self.prompt_used, self.transaction, self.cost)
    }
}

pub async fn run(args: RunArgs) -> ToolOutput {
    run_with_config(&Config::default(), args).await
}

/// Like [`run`], with a fresh HTTP transport built from `config`.
pub async fn run_with_config(config: &Config, args: RunArgs) -> ToolOutput {
    if let Err(output) = validate(&args) {
        return output;
    }

    match HttpTransport::new(config.client.clone(), config.logging.clone()) {
        Ok(transport) => run_with_transport(&transport, config, args).await,
        Err(e) => api_error(&e),
    }
}

pub async fn run_with_transport<T>(transport: &T, config: &Config, args: RunArgs) -> ToolOutput
where
    T: Transport + ?Sized,
{
    let (prompt, api_key) = match validate(&args) {
        Ok(found) => found,
        Err(output) => return output,
    };

    let retry = args.retry_config(&config.retry);
    if let Err(e) = retry.validate() {
        return ToolOutput::message(format!("Invalid retry configuration: {}", e));
    }

    let model = args
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(&config.default_model);

    let result = retry_with_backoff(&retry, &retry.retry_on, || {
        get_model_response(transport, model, prompt, api_key, &args.params)
    })
    .await;

    match result {
        Ok(text) => ToolOutput::message(text),
        Err(e) => api_error(&e),
    }
}

fn validate(args: &RunArgs) -> Result<(&str, &str), ToolOutput> {
    let prompt = match args.prompt.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ToolOutput::message(NO_PROMPT_MESSAGE)),
    };

    let api_key = match args.api_keys.get(API_KEY_NAME).map(String::as_str) {
        Some(k) if !k.is_empty() => k,
        _ => return Err(ToolOutput::message(NO_API_KEY_MESSAGE)),
    };

    Ok((prompt, api_key))
}

fn api_error(error: &crate::types::ToolError) -> ToolOutput {
    let message = format!("{}{}", API_ERROR_PREFIX, error);
    tracing::error!(error_type = error.error_type(), "{}", message);
    ToolOutput::message(message)
}
