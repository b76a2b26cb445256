//! Provider-specific stream extraction
//!
//! Turns a chosen source's embed/page URL into a directly playable URL.
//! Dispatch is an exhaustive match on [`Provider`]:
//! - vidmoly: extraction endpoint + optional proxy wrapping ([`vidmoly`])
//! - vidzy: extraction endpoint, result used as-is ([`vidzy`])
//! - vixsrc and anything else: returned unchanged (vixsrc is pre-wrapped during normalization)

pub mod vidmoly;
pub mod vidzy;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::api::{http_client, trim_base, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::config::Config;
use crate::models::Provider;
use crate::proxy::ProxyUrlBuilder;

/// Extraction failure, surfaced to the caller (who may try another source)
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Extraction endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Extraction endpoint returned an empty body")]
    EmptyBody,

    #[error("Invalid extraction response: {0}")]
    InvalidResponse(String),

    #[error("No stream found")]
    MissingStream,

    #[error("{0}")]
    Provider(String),
}

impl ExtractionError {
    /// Human-readable failure reason
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Final URL plus how it was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub url: String,
    /// Method tag reported by the extraction endpoint, if one was called
    pub method: Option<String>,
    /// Whether `url` points at our own proxy
    pub proxied: bool,
}

impl ExtractionResult {
    fn passthrough(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: None,
            proxied: false,
        }
    }
}

/// Resolves embed URLs to playable URLs. Stateless apart from the shared HTTP client.
#[derive(Debug, Clone)]
pub struct ProviderExtractor {
    base_url: String,
    client: reqwest::Client,
    proxy: ProxyUrlBuilder,
}

impl ProviderExtractor {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create an extractor with a custom base URL (for testing).
    /// Proxy URLs are built against the same base.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, http_client(DEFAULT_REQUEST_TIMEOUT))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = trim_base(base_url);
        Self {
            proxy: ProxyUrlBuilder::new(base_url.clone()),
            base_url,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_client(config.base_url(), http_client(config.request_timeout()))
    }

    pub fn proxy(&self) -> &ProxyUrlBuilder {
        &self.proxy
    }

    /// Resolve `url` for the named provider and return the final URL
    pub async fn extract(&self, url: &str, provider: &str) -> Result<String, ExtractionError> {
        self.resolve(url, &Provider::canonical(provider))
            .await
            .map(|r| r.url)
    }

    /// Resolve `url` and report how the final URL was obtained
    pub async fn resolve(
        &self,
        url: &str,
        provider: &Provider,
    ) -> Result<ExtractionResult, ExtractionError> {
        match provider {
            Provider::Vidmoly => vidmoly::extract(self, url).await,
            Provider::Vidzy => vidzy::extract(self, url).await,
            Provider::Vixsrc | Provider::Other(_) => Ok(ExtractionResult::passthrough(url)),
        }
    }

    /// POST a JSON body to `{base}{path}` and decode the JSON answer.
    ///
    /// Non-2xx and empty bodies are hard failures.
    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ExtractionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status: StatusCode = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyBody);
        }

        serde_json::from_str(&text)
            .map_err(|e| ExtractionError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

impl Default for ProviderExtractor {
    fn default() -> Self {
        Self::new()
    }
}
