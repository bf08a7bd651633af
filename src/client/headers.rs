use crate::config::HeaderConfig;
use crate::types::{Result, ToolError};
use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::str::FromStr;

pub const REFERER_HEADER: &str = "HTTP-Referer";
pub const TITLE_HEADER: &str = "X-Title";

/// Headers for one chat-completion request: bearer auth, JSON content type,
/// the two application identification headers and any configured extras.
pub fn build_request_headers(api_key: &str, config: &HeaderConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|e| ToolError::Header(format!("Invalid API key: {}", e)))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    insert_header(&mut headers, REFERER_HEADER, &config.referer)?;
    insert_header(&mut headers, TITLE_HEADER, &config.title)?;

    // Extras never override the headers above
    for (key, value) in &config.add {
        let name = HeaderName::from_str(key)
            .map_err(|e| ToolError::Header(format!("Invalid header name '{}': {}", key, e)))?;

        if !headers.contains_key(&name) {
            let val = HeaderValue::from_str(value).map_err(|e| {
                ToolError::Header(format!("Invalid header value for '{}': {}", key, e))
            })?;
            headers.insert(name, val);
        }
    }

    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, key: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_str(key)
        .map_err(|e| ToolError::Header(format!("Invalid header name '{}': {}", key, e)))?;
    let val = HeaderValue::from_str(value)
        .map_err(|e| ToolError::Header(format!("Invalid header value for '{}': {}", key, e)))?;
    headers.insert(name, val);
    Ok(())
}
