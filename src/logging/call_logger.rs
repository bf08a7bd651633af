use crate::config::LoggingConfig;
use chrono::{DateTime, Utc};
use http::header::HeaderMap;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct UpstreamRequestLog {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpstreamResponseLog {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub status_code: u16,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured records for a single upstream call.
pub struct CallLogger {
    config: LoggingConfig,
    start_time: Instant,
}

impl CallLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
        }
    }

    pub fn request_log(
        &self,
        model: &str,
        endpoint: &str,
        headers: &HeaderMap,
        body: Option<&str>,
    ) -> Option<UpstreamRequestLog> {
        if !self.config.enabled {
            return None;
        }

        Some(UpstreamRequestLog {
            timestamp: Utc::now(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            headers: if self.config.include_headers {
                Some(Self::headers_to_map(headers))
            } else {
                None
            },
            body: if self.config.include_body {
                body.map(|s| s.to_string())
            } else {
                None
            },
        })
    }

    pub fn response_log(
        &self,
        model: &str,
        status_code: u16,
        body: Option<&str>,
        error: Option<&str>,
    ) -> Option<UpstreamResponseLog> {
        if !self.config.enabled {
            return None;
        }

        Some(UpstreamResponseLog {
            timestamp: Utc::now(),
            model: model.to_string(),
            status_code,
            duration_ms: self.start_time.elapsed().as_millis() as u64,
            body: if self.config.include_body {
                body.map(|s| s.to_string())
            } else {
                None
            },
            error: error.map(|s| s.to_string()),
        })
    }

    pub fn log_upstream_request(
        &self,
        model: &str,
        endpoint: &str,
        headers: &HeaderMap,
        body: Option<&str>,
    ) {
        if let Some(log) = self.request_log(model, endpoint, headers, body) {
            tracing::debug!(log = ?log, "Upstream request");
        }
    }

    pub fn log_upstream_response(
        &self,
        model: &str,
        status_code: u16,
        body: Option<&str>,
        error: Option<&str>,
    ) {
        let Some(log) = self.response_log(model, status_code, body, error) else {
            return;
        };

        if status_code >= 500 {
            tracing::error!(log = ?log, "Upstream response");
        } else if status_code >= 400 {
            tracing::warn!(log = ?log, "Upstream response");
        } else {
            tracing::debug!(log = ?log, "Upstream response");
        }
    }

    fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                let key = name.to_string();

                let val = if value.is_sensitive() || Self::is_sensitive_header(&key) {
                    "[REDACTED]".to_string()
                } else {
                    value.to_str().unwrap_or("<invalid>").to_string()
                };

                (key, val)
            })
            .collect()
    }

    fn is_sensitive_header(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.contains("authorization")
            || lower.contains("api-key")
            || lower.contains("api_key")
            || lower.contains("apikey")
            || lower.contains("token")
            || lower.contains("secret")
    }
}
