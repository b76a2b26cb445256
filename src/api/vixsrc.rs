//! Vixsrc client
//!
//! Fetches raw stream descriptors from `/api/vixsrc`. Upstream URLs are not
//! playable as-is; each one is wrapped behind our `/api/vixsrc-proxy`
//! endpoint during normalization.

use async_trait::async_trait;

use super::{
    get_json, http_client, trim_base, SourceClient, SourceFetchError, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::models::{MediaRequest, SourceKind, StreamingSource};
use crate::normalize::{normalize_vixsrc, VixsrcPayload};
use crate::proxy::ProxyUrlBuilder;

const VIXSRC_PATH: &str = "/api/vixsrc";

/// Family C client: `{ success, streams: [...] }`
pub struct VixsrcClient {
    base_url: String,
    client: reqwest::Client,
    proxy: ProxyUrlBuilder,
}

impl VixsrcClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing).
    /// The proxy wrapping uses the same base.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, http_client(DEFAULT_REQUEST_TIMEOUT))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = trim_base(base_url);
        Self {
            proxy: ProxyUrlBuilder::new(base_url.clone()),
            base_url,
            client,
        }
    }
}

impl Default for VixsrcClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for a request (`tmdbId`, `type`, optional `season`/`episode`)
pub fn query_params(request: &MediaRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("tmdbId", request.id().to_string()),
        ("type", request.media_type().to_string()),
    ];
    if let Some((season, episode)) = request.season_episode() {
        params.push(("season", season.to_string()));
        params.push(("episode", episode.to_string()));
    }
    params
}

#[async_trait]
impl SourceClient for VixsrcClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Vixsrc
    }

    async fn fetch(&self, request: &MediaRequest) -> Result<Vec<StreamingSource>, SourceFetchError> {
        let url = format!("{}{}", self.base_url, VIXSRC_PATH);
        let payload: VixsrcPayload = get_json(&self.client, &url, &query_params(request)).await?;

        if !payload.success {
            return Err(SourceFetchError::Unsuccessful);
        }

        Ok(normalize_vixsrc(
            payload.streams.unwrap_or_default(),
            &self.proxy,
        ))
    }
}
