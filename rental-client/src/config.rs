//! Client configuration

use crate::{ClientError, ClientResult, HttpClient};

/// Default API root when `RENTAL_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "RENTAL_API_URL";
pub const ENV_API_TOKEN: &str = "RENTAL_API_TOKEN";
pub const ENV_API_TIMEOUT: &str = "RENTAL_API_TIMEOUT_SECS";

/// Client configuration for connecting to the rental API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the `/api` prefix (e.g., "http://localhost:5000/api")
    pub base_url: String,

    /// Bearer token, acquired externally
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `RENTAL_API_URL`, `RENTAL_API_TOKEN` and `RENTAL_API_TIMEOUT_SECS`
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test maps)
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::new(non_empty(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()));
        if let Some(token) = non_empty(ENV_API_TOKEN) {
            config = config.with_token(token);
        }
        if let Some(raw) = non_empty(ENV_API_TIMEOUT) {
            let secs = raw.parse::<u64>().map_err(|_| {
                ClientError::Config(format!("{} must be a whole number of seconds, got {:?}", ENV_API_TIMEOUT, raw))
            })?;
            config = config.with_timeout(secs);
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout, 30);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://rentals.example.com/api/"),
            (ENV_API_TOKEN, "secret"),
            (ENV_API_TIMEOUT, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://rentals.example.com/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, 5);
    }

    #[test]
    fn test_blank_token_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "  ")])).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_API_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
