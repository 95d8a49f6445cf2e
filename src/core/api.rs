use crate::config::ConfigProvider;
use crate::utils::error::{ClientError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Thin JSON-over-HTTP client bound to one API origin.
///
/// Every call is a single GET attempt. A non-2xx status becomes
/// [`ClientError::Http`] and the body is not read.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        crate::utils::validation::validate_url("base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidConfigValue {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self { base_url, client })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::with_client(config.base_url(), client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins `endpoint` onto the origin by plain concatenation, so a base of
    /// `http://host/api` and `/plans` gives `http://host/api/plans`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{}{}", base, endpoint)
        } else {
            format!("{}/{}", base, endpoint)
        }
    }

    pub async fn get_json(&self, endpoint: &str) -> Result<serde_json::Value> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            tracing::warn!("❌ GET {} failed with status {}", url, status.as_u16());
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        Ok(body)
    }
}

/// Convenience for callers that only have a timeout in seconds.
pub fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}
