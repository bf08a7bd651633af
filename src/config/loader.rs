use super::models::Config;
use crate::types::Result;
use crate::types::ToolError;
use std::fs;
use std::path::Path;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| ToolError::Config(format!("Failed to read config file: {}", e)))?;

    // Expand environment variables
    let expanded = expand_env_vars(&content)?;

    let is_json = path.as_ref().extension().and_then(|s| s.to_str()) == Some("json");
    let config = parse_config(&expanded, is_json)?;

    config
        .validate()
        .map_err(|e| ToolError::Config(format!("Invalid configuration: {}", e)))?;

    Ok(config)
}

/// Like [`load_config`], but a missing file yields the built-in defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    if !path.as_ref().exists() {
        tracing::debug!(
            path = %path.as_ref().display(),
            "Config file not found, using defaults"
        );
        return Ok(Config::default());
    }
    load_config(path)
}

fn parse_config(content: &str, is_json: bool) -> Result<Config> {
    if is_json {
        return serde_json::from_str(content)
            .map_err(|e| ToolError::Config(format!("Failed to parse JSON config: {}", e)));
    }

    // An empty YAML document deserializes to unit, not to a map
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(content)
        .map_err(|e| ToolError::Config(format!("Failed to parse YAML config: {}", e)))
}

fn expand_env_vars(content: &str) -> Result<String> {
    // Match ${VAR_NAME} or ${VAR_NAME:-default}
    let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| ToolError::Internal(format!("Invalid env pattern: {}", e)))?;

    let expanded = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name)
            .ok()
            .or_else(|| caps.get(3).map(|m| m.as_str().to_string()))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Environment variable '{}' not found and no default provided",
                    var_name
                );
                String::new()
            })
    });

    Ok(expanded.into_owned())
}
