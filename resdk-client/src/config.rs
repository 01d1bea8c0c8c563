//! Client configuration.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the server URL.
pub const ENV_HOST_URL: &str = "RESOLWE_HOST_URL";
/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "RESOLWE_API_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "RESOLWE_TIMEOUT_SECS";

/// Connection settings for a Resolwe server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolweConfig {
    /// Server base URL (e.g. `https://app.genialis.com`).
    pub url: String,
    /// Path prefix of the REST API.
    pub api_path: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Token sent as bearer authorization on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Page size requested on list fetches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Default for ResolweConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            api_path: "/api".to_string(),
            timeout_secs: 30,
            token: None,
            page_size: None,
        }
    }
}

impl ResolweConfig {
    /// Configuration for the given server URL with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Defaults overlaid with `RESOLWE_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var(ENV_HOST_URL) {
            config.url = url;
        }
        if let Ok(token) = env::var(ENV_API_TOKEN) {
            config.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be a number, got {raw:?}"))
            })?;
        }
        Ok(config)
    }

    /// Full URL of an API endpoint, e.g. `http://host/api/sample`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let api = self.api_path.trim_matches('/');
        let endpoint = endpoint.trim_matches('/');
        if api.is_empty() {
            format!("{base}/{endpoint}")
        } else {
            format!("{base}/{api}/{endpoint}")
        }
    }
}
