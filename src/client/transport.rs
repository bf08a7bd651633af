use super::headers::build_request_headers;
use crate::config::{ClientConfig, LoggingConfig};
use crate::logging::CallLogger;
use crate::types::openrouter::{ChatCompletionRequest, ChatCompletionResponse};
use crate::types::{Result, ToolError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

/// Sends one chat-completion request and decodes the response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
    logging: LoggingConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, logging: LoggingConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout_duration())
            .connect_timeout(config.connect_timeout_duration());

        if !config.ssl_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "SSL verification is disabled"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ToolError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            logging,
        })
    }

    pub fn endpoint(&self) -> String {
        self.config.completions_url()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let logger = CallLogger::new(self.logging.clone());
        let endpoint = self.endpoint();
        let headers = build_request_headers(api_key, &self.config.headers)?;
        let body = serde_json::to_vec(request)?;

        logger.log_upstream_request(
            &request.model,
            &endpoint,
            &headers,
            std::str::from_utf8(&body).ok(),
        );

        let response = self
            .client
            .post(&endpoint)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::Timeout
                } else {
                    ToolError::Http(e)
                }
            })?;

        let status = response.status();
        let response_body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::Timeout
            } else {
                ToolError::Http(e)
            }
        })?;

        if !status.is_success() {
            let message = upstream_error_message(&response_body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            logger.log_upstream_response(
                &request.model,
                status.as_u16(),
                Some(&response_body),
                Some(&message),
            );
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        logger.log_upstream_response(&request.model, status.as_u16(), Some(&response_body), None);

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;
        Ok(parsed)
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}
