//! Runtime configuration for the Gemini collaborator.

use thiserror::Error;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not found! Pass --api-key or set GEMINI_API_KEY.")]
    MissingApiKey,
    #[error("invalid API base URL {0:?}: {1}")]
    InvalidApiBase(String, url::ParseError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: Url,
}

impl Config {
    /// Build from raw values. Blank keys count as missing.
    pub fn new(api_key: Option<String>, model: &str, api_base: &str) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        // Url::join drops the last segment unless the base ends with '/'.
        let base = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };
        let api_base =
            Url::parse(&base).map_err(|e| ConfigError::InvalidApiBase(api_base.to_string(), e))?;
        Ok(Self {
            api_key,
            model: model.to_string(),
            api_base,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: Url::parse(DEFAULT_API_BASE).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_missing() {
        let config = Config::new(Some("   ".into()), DEFAULT_MODEL, DEFAULT_API_BASE).unwrap();
        assert!(config.api_key.is_none());
        assert!(matches!(config.require_api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn key_is_trimmed() {
        let config = Config::new(Some(" abc \n".into()), DEFAULT_MODEL, DEFAULT_API_BASE).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "abc");
    }

    #[test]
    fn base_gains_trailing_slash() {
        let config = Config::new(None, DEFAULT_MODEL, "http://localhost:8080/v1beta").unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:8080/v1beta/");
    }

    #[test]
    fn bad_base_is_rejected() {
        let err = Config::new(None, DEFAULT_MODEL, "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiBase(..)));
    }

    #[test]
    fn default_points_at_public_api() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_base.host_str(), Some("generativelanguage.googleapis.com"));
    }
}
