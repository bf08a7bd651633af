use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Header error: {0}")]
    Header(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn error_type(&self) -> &str {
        match self {
            ToolError::Config(_) => "configuration_error",
            ToolError::InvalidValue(_) => "invalid_value",
            ToolError::Upstream { .. } => "upstream_error",
            ToolError::MalformedResponse(_) => "malformed_response",
            ToolError::Timeout => "timeout",
            ToolError::Http(_) => "http_error",
            ToolError::Json(_) => "json_error",
            ToolError::Header(_) => "header_error",
            ToolError::Internal(_) => "internal_error",
        }
    }

    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ToolError::Upstream { status, .. } => Some(*status),
            ToolError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
