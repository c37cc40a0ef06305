use std::env;
use std::time::Duration;

use crate::error::ApiError;

pub const BASE_URL_ENV: &str = "PREFLIGHT_API_BASE_URL";
pub const TOKEN_ENV: &str = "PREFLIGHT_API_TOKEN";
pub const TIMEOUT_ENV: &str = "PREFLIGHT_TIMEOUT_SECS";
pub const LOG_JSON_ENV: &str = "PREFLIGHT_LOG_JSON";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for the remote contest API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token issued by the identity provider.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url: String = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::MissingBaseUrl);
        }
        Ok(Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Explicit values win over the environment.
    pub fn resolve(base_url: Option<String>, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .ok_or(ApiError::MissingBaseUrl)?;
        let token = token.or_else(|| env::var(TOKEN_ENV).ok());
        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self::new(base_url)?
            .with_token(token)
            .with_timeout(Duration::from_secs(timeout)))
    }
}

pub fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let cfg = ClientConfig::new(" https://api.example.com/ ").expect("valid url");
        assert_eq!(cfg.base_url, "https://api.example.com");
        assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn empty_base_url_is_an_error() {
        assert!(matches!(ClientConfig::new("  "), Err(ApiError::MissingBaseUrl)));
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = ClientConfig::resolve(Some("http://localhost:8000".into()), Some("tok".into()))
            .expect("explicit config");
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.token.as_deref(), Some("tok"));
    }

    #[test]
    fn blank_token_is_dropped() {
        let cfg = ClientConfig::new("http://x").expect("valid url").with_token(Some(" ".into()));
        assert!(cfg.token.is_none());
    }
}
