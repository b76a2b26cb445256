//! Movix catalog proxy clients
//!
//! Both families live behind the same `/api/movix-proxy` endpoint and are
//! selected by the `path` query parameter:
//! - `tmdb/movie/{id}` and `tmdb/tv/{id}&season={s}&episode={e}` (flat links)
//! - `fstream/movie/{id}` and `fstream/tv/{id}/season/{s}` (language-keyed players)

use async_trait::async_trait;

use super::{
    get_json, http_client, trim_base, SourceClient, SourceFetchError, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::models::{MediaRequest, SourceKind, StreamingSource};
use crate::normalize::{
    normalize_fstream, normalize_player_links, FStreamPayload, PlayerLinksPayload,
};

const MOVIX_PROXY_PATH: &str = "/api/movix-proxy";

/// `path` value for the flat-links family
pub fn tmdb_path(request: &MediaRequest) -> String {
    match *request {
        MediaRequest::Movie { id } => format!("tmdb/movie/{}", id),
        MediaRequest::Series {
            id,
            season,
            episode,
        } => format!("tmdb/tv/{}&season={}&episode={}", id, season, episode),
    }
}

/// `path` value for the FStream family. Series fetch the whole season.
pub fn fstream_path(request: &MediaRequest) -> String {
    match *request {
        MediaRequest::Movie { id } => format!("fstream/movie/{}", id),
        MediaRequest::Series { id, season, .. } => format!("fstream/tv/{}/season/{}", id, season),
    }
}

/// Family A client: `{ player_links: [...] }`
pub struct MovixTmdbClient {
    base_url: String,
    client: reqwest::Client,
}

impl MovixTmdbClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, http_client(DEFAULT_REQUEST_TIMEOUT))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(base_url),
            client,
        }
    }
}

impl Default for MovixTmdbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceClient for MovixTmdbClient {
    fn kind(&self) -> SourceKind {
        SourceKind::MovixTmdb
    }

    async fn fetch(&self, request: &MediaRequest) -> Result<Vec<StreamingSource>, SourceFetchError> {
        let url = format!("{}{}", self.base_url, MOVIX_PROXY_PATH);
        let payload: PlayerLinksPayload =
            get_json(&self.client, &url, &[("path", tmdb_path(request))]).await?;
        Ok(normalize_player_links(payload))
    }
}

/// Family B client: `{ players: { lang: [...] } }` or `{ episodes: {...} }`
pub struct FStreamClient {
    base_url: String,
    client: reqwest::Client,
}

impl FStreamClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, http_client(DEFAULT_REQUEST_TIMEOUT))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: trim_base(base_url),
            client,
        }
    }
}

impl Default for FStreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceClient for FStreamClient {
    fn kind(&self) -> SourceKind {
        SourceKind::FStream
    }

    async fn fetch(&self, request: &MediaRequest) -> Result<Vec<StreamingSource>, SourceFetchError> {
        let url = format!("{}{}", self.base_url, MOVIX_PROXY_PATH);
        let payload: FStreamPayload =
            get_json(&self.client, &url, &[("path", fstream_path(request))]).await?;
        Ok(normalize_fstream(payload, request))
    }
}
