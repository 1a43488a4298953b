//! Client configuration files.
//!
//! A config names the endpoint and how to talk to it:
//!
//! ```yaml
//! url: https://api.github.com/graphql
//! headers:
//!   Authorization: Bearer my-token
//! timeout: 25
//! retry:
//!   attempts: 3
//!   delay: 2
//! ```
//!
//! YAML (`.yml`, `.yaml`) and JSON (`.json`) are detected by extension.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config in {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Endpoint configuration for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// The GraphQL endpoint URL
    pub url: String,

    /// HTTP headers sent with every request (e.g., for authentication)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds (default: 25)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retry settings for async requests
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Total attempts including the first (default: 3)
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay between attempts in seconds (default: 2)
    #[serde(default = "default_delay")]
    pub delay: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay: default_delay(),
        }
    }
}

const fn default_timeout() -> u64 {
    25
}

const fn default_attempts() -> u32 {
    3
}

const fn default_delay() -> u64 {
    2
}

/// Load a client config from the specified path.
/// The format is picked from the file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(url = %config.url, "Config loaded successfully");
    Ok(config)
}

/// Load a client config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<ClientConfig, ConfigError> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    tracing::debug!(extension, "Detecting config format");

    let config: ClientConfig = match extension {
        "yml" | "yaml" => serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("YAML parse error: {e}"),
        })?,
        "json" => serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("JSON parse error: {e}"),
        })?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn validate_config(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    if !(config.url.starts_with("http://") || config.url.starts_with("https://")) {
        return Err(invalid("url must start with http:// or https://"));
    }
    if config.retry.attempts == 0 {
        return Err(invalid("retry.attempts must be at least 1"));
    }
    if config.timeout == 0 {
        return Err(invalid("timeout must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_with_defaults() {
        let config = load_config_from_str(
            "url: https://example.com/graphql\n",
            Path::new("client.yaml"),
        )
        .unwrap();

        assert_eq!(config.url, "https://example.com/graphql");
        assert!(config.headers.is_empty());
        assert_eq!(config.timeout, 25);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_yaml_full() {
        let yaml = r"
url: https://example.com/graphql
headers:
  Authorization: Bearer token
  X-API-Key: my-key
timeout: 60
retry:
  attempts: 5
  delay: 1
";
        let config = load_config_from_str(yaml, Path::new("client.yml")).unwrap();

        assert_eq!(config.timeout, 60);
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay, 1);
        assert_eq!(
            config.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
    }

    #[test]
    fn test_json() {
        let json = r#"{"url": "http://localhost:4000/graphql", "retry": {"attempts": 1}}"#;
        let config = load_config_from_str(json, Path::new("client.json")).unwrap();
        assert_eq!(config.retry.attempts, 1);
        assert_eq!(config.retry.delay, 2);
    }

    #[test]
    fn test_invalid_url() {
        let err = load_config_from_str("url: ftp://example.com\n", Path::new("c.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_zero_attempts() {
        let json = r#"{"url": "https://example.com", "retry": {"attempts": 0}}"#;
        let err = load_config_from_str(json, Path::new("c.json")).unwrap_err();
        assert!(err.to_string().contains("retry.attempts"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = load_config_from_str("url = 'x'", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        fs::write(&path, "url: https://example.com/graphql\ntimeout: 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeout, 10);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/client.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
