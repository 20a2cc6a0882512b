//! HTTP client for the RAWG game-metadata API.

use serde_json::Value;

/// Default RAWG API base URL.
const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// Request timeout for upstream calls, in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Error type for upstream catalog failures.
///
/// These never reach API callers; the service layer masks them behind the
/// degraded fallback.
#[derive(Debug, thiserror::Error)]
pub enum RawgError {
    /// Network-level failure, timeout, or TLS problem.
    #[error("RAWG request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream returned a non-success HTTP status.
    #[error("RAWG upstream returned status {0}")]
    Status(u16),
}

/// Configuration for the RAWG client.
#[derive(Debug, Clone)]
pub struct RawgConfig {
    /// API base URL (override for tests).
    pub base_url: String,
    /// API key appended to every request.
    pub api_key: String,
}

impl RawgConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `RAWG_API_KEY`  | no       | empty (anonymous quota)   |
    /// | `RAWG_BASE_URL` | no       | `https://api.rawg.io/api` |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("RAWG_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("RAWG_API_KEY").unwrap_or_default(),
        }
    }
}

/// Thin JSON client over the RAWG REST API.
pub struct RawgClient {
    config: RawgConfig,
    http: reqwest::Client,
}

impl RawgClient {
    /// Build a client with the given configuration.
    pub fn new(config: RawgConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    /// Search the RAWG catalog.
    ///
    /// `filters` are extra query parameters (genres, platforms, page, ...)
    /// passed through verbatim.
    pub async fn search(
        &self,
        query: &str,
        filters: &[(String, String)],
    ) -> Result<Value, RawgError> {
        let url = format!("{}/games", self.config.base_url);
        let mut params: Vec<(&str, &str)> = vec![("search", query)];
        if !self.config.api_key.is_empty() {
            params.push(("key", &self.config.api_key));
        }
        for (k, v) in filters {
            params.push((k.as_str(), v.as_str()));
        }

        let response = self.http.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(RawgError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Fetch a single game by its RAWG id.
    pub async fn get(&self, rawg_id: i64) -> Result<Value, RawgError> {
        let url = format!("{}/games/{rawg_id}", self.config.base_url);
        let mut request = self.http.get(&url);
        if !self.config.api_key.is_empty() {
            request = request.query(&[("key", &self.config.api_key)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RawgError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
