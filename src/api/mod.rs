//! Upstream source clients
//!
//! - Movix TMDB: flat `player_links` lists (Family A)
//! - FStream: language-keyed player maps (Family B)
//! - Vixsrc: raw stream lists re-wrapped behind our proxy (Family C)
//!
//! Every client implements [`SourceClient`] so the aggregator can fan out
//! over them without knowing their wire shapes.

pub mod movix;
pub mod vixsrc;

pub use movix::{FStreamClient, MovixTmdbClient};
pub use vixsrc::VixsrcClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::models::{MediaRequest, SourceKind, StreamingSource};

/// Default service base URL hosting the catalog proxy and extraction endpoints
pub const DEFAULT_BASE_URL: &str = "https://anisflix.vercel.app";

/// Per-request HTTP timeout used when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-source fetch failure. Never fatal to an aggregation.
#[derive(Error, Debug)]
pub enum SourceFetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Upstream reported an unsuccessful lookup")]
    Unsuccessful,
}

/// One upstream endpoint family
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Which family this client fetches
    fn kind(&self) -> SourceKind;

    /// Fetch and normalize sources for `request`
    async fn fetch(&self, request: &MediaRequest) -> Result<Vec<StreamingSource>, SourceFetchError>;
}

/// Build the shared HTTP client
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// GET `url` with query parameters and decode a JSON body
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, SourceFetchError> {
    let response = client
        .get(url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceFetchError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| SourceFetchError::InvalidResponse(format!("JSON parse error: {}", e)))
}

pub(crate) fn trim_base(base_url: impl Into<String>) -> String {
    let base_url: String = base_url.into();
    base_url.trim_end_matches('/').to_string()
}
