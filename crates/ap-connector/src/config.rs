//! Connection configuration

use serde::{Deserialize, Serialize};

use crate::{ConnectorError, ConnectorResult};

/// Environment variable holding the controller API base URL
pub const ENV_API_URL: &str = "ARMONIA_API_URL";

/// Environment variable holding the client auth token
pub const ENV_AUTH_TOKEN: &str = "ARMONIA_AUTH_TOKEN";

/// Default controller API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:40402/api/ARA";

/// Controller connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// API base URL, e.g. `http://192.168.1.30:40402/api/ARA`
    pub api_url: String,

    /// Value of the `authClientToken` header (if required)
    pub auth_token: Option<String>,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeout_ms: 10_000,
        }
    }
}

impl ConnectionConfig {
    /// Create config for an explicit base URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Read `ARMONIA_API_URL` / `ARMONIA_AUTH_TOKEN`, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config.auth_token = std::env::var(ENV_AUTH_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty());
        config
    }

    /// Set auth token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn validate(&self) -> ConnectorResult<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ConnectorError::InvalidConfig("API URL is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConnectorError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got {url}"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ConnectorError::InvalidConfig("timeout must be > 0".into()));
        }
        Ok(())
    }

    /// Full URL of a controller endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), endpoint)
    }
}
