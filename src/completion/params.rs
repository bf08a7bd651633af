use crate::types::openrouter::{
    ChatCompletionRequest, DataCollection, Message, ProviderPreferences, ProviderSort,
    Quantization, ResponseFormatKind,
};
use crate::types::{Result, ToolError};

pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Optional request parameters. `None` fields are left out of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub temperature: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub logprobs: Option<bool>,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormatKind>,
    pub provider_order: Option<Vec<String>>,
    pub allow_fallbacks: Option<bool>,
    pub require_parameters: Option<bool>,
    pub data_collection: Option<DataCollection>,
    pub ignore_providers: Option<Vec<String>>,
    pub quantizations: Option<Vec<Quantization>>,
    pub sort: Option<ProviderSort>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: Some(DEFAULT_TEMPERATURE),
            frequency_penalty: None,
            presence_penalty: None,
            logprobs: None,
            max_tokens: None,
            response_format: None,
            provider_order: None,
            allow_fallbacks: None,
            require_parameters: None,
            data_collection: None,
            ignore_providers: None,
            quantizations: None,
            sort: None,
        }
    }
}

impl CompletionParams {
    /// Routing preferences, or `None` when no routing field is set.
    pub fn provider_preferences(&self) -> Option<ProviderPreferences> {
        let prefs = ProviderPreferences {
            order: self.provider_order.clone(),
            allow_fallbacks: self.allow_fallbacks,
            require_parameters: self.require_parameters,
            data_collection: self.data_collection,
            ignore: self.ignore_providers.clone(),
            quantizations: self.quantizations.clone(),
            sort: self.sort,
        };

        if prefs.is_empty() {
            None
        } else {
            Some(prefs)
        }
    }

    fn validate(&self) -> Result<()> {
        let floats = [
            ("temperature", self.temperature),
            ("frequency_penalty", self.frequency_penalty),
            ("presence_penalty", self.presence_penalty),
        ];

        for (name, value) in floats {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ToolError::InvalidValue(format!(
                        "{} must be a finite number (got {})",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Assemble the request for a single user-role prompt.
pub fn build_request(
    model: &str,
    prompt: &str,
    params: &CompletionParams,
) -> Result<ChatCompletionRequest> {
    params.validate()?;

    Ok(ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(prompt)],
        temperature: params.temperature,
        frequency_penalty: params.frequency_penalty,
        presence_penalty: params.presence_penalty,
        logprobs: params.logprobs,
        max_tokens: params.max_tokens,
        response_format: params.response_format.map(Into::into),
        provider: params.provider_preferences(),
    })
}
