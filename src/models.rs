//! Data structures shared across the aggregation and extraction layers
//!
//! Organized by domain:
//! - **Requests**: what the caller asks sources for (movie or episode)
//! - **Sources**: normalized stream candidates and their canonical provider/language
//! - **Aggregation**: per-source fetch reports and the merged outcome

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Request Models
// =============================================================================

/// Identity of the media item sources are requested for (TMDB ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaRequest {
    Movie { id: u64 },
    Series { id: u64, season: u16, episode: u16 },
}

impl MediaRequest {
    pub fn movie(id: u64) -> Self {
        MediaRequest::Movie { id }
    }

    pub fn episode(id: u64, season: u16, episode: u16) -> Self {
        MediaRequest::Series {
            id,
            season,
            episode,
        }
    }

    /// TMDB id of the movie or series
    pub fn id(&self) -> u64 {
        match self {
            MediaRequest::Movie { id } | MediaRequest::Series { id, .. } => *id,
        }
    }

    /// Upstream media type token ("movie" or "tv")
    pub fn media_type(&self) -> &'static str {
        match self {
            MediaRequest::Movie { .. } => "movie",
            MediaRequest::Series { .. } => "tv",
        }
    }

    /// Season and episode, for series requests
    pub fn season_episode(&self) -> Option<(u16, u16)> {
        match self {
            MediaRequest::Movie { .. } => None,
            MediaRequest::Series {
                season, episode, ..
            } => Some((*season, *episode)),
        }
    }
}

impl fmt::Display for MediaRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaRequest::Movie { id } => write!(f, "movie {}", id),
            MediaRequest::Series {
                id,
                season,
                episode,
            } => write!(f, "tv {} S{:02}E{:02}", id, season, episode),
        }
    }
}

// =============================================================================
// Source Models
// =============================================================================

/// Canonical provider id
///
/// Raw provider names are folded to lower case before matching, so
/// `"VidMoly HD"` and `"vidmoly"` land on the same variant. Anything
/// unrecognized is kept as `Other` and is removed by the allow-list filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    Vidmoly,
    Vidzy,
    Vixsrc,
    Other(String),
}

impl Provider {
    /// Canonicalize a raw provider/player name
    pub fn canonical(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("vidmoly") {
            Provider::Vidmoly
        } else if lower.contains("vidzy") {
            Provider::Vidzy
        } else if lower == "vixsrc" {
            Provider::Vixsrc
        } else {
            Provider::Other(lower)
        }
    }

    /// Whether the provider passes the allow-list
    pub fn is_known(&self) -> bool {
        !matches!(self, Provider::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Provider::Vidmoly => "vidmoly",
            Provider::Vidzy => "vidzy",
            Provider::Vixsrc => "vixsrc",
            Provider::Other(name) => name,
        }
    }

    /// Provider id with its first letter upper-cased ("vidmoly" -> "Vidmoly")
    pub fn label(&self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for Provider {
    fn from(raw: String) -> Self {
        Provider::canonical(&raw)
    }
}

impl From<&str> for Provider {
    fn from(raw: &str) -> Self {
        Provider::canonical(raw)
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.as_str().to_string()
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio language of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    /// French dub
    #[default]
    Vf,
    /// Original audio with French subtitles
    Vostfr,
    /// Original audio
    Vo,
}

impl Language {
    /// Map a player-map language key to a language.
    ///
    /// Exact table; unknown keys fall back to VF.
    pub fn from_player_key(key: &str) -> Self {
        match key {
            "VOSTFR" => Language::Vostfr,
            "Default" | "VFQ" | "VF" => Language::Vf,
            "VO" | "ENG" | "English" => Language::Vo,
            _ => Language::Vf,
        }
    }

    /// Loose, case-insensitive mapping for free-form language labels
    pub fn from_label(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("vostfr") || lower.contains("subtitle") {
            Language::Vostfr
        } else if lower.contains("french")
            || lower.contains("français")
            || matches!(lower.as_str(), "fr" | "vf" | "vfq" | "default")
        {
            Language::Vf
        } else if lower.contains("english") || matches!(lower.as_str(), "en" | "eng" | "vo") {
            Language::Vo
        } else {
            Language::Vf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Vf => "VF",
            Language::Vostfr => "VOSTFR",
            Language::Vo => "VO",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream endpoint family a source was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Flat `player_links` list behind the catalog proxy
    MovixTmdb,
    /// Language-keyed player map behind the catalog proxy
    FStream,
    /// Raw stream list that must be re-wrapped behind our proxy
    Vixsrc,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::MovixTmdb => "movix-tmdb",
            SourceKind::FStream => "fstream",
            SourceKind::Vixsrc => "vixsrc",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External subtitle track attached to a source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subtitle {
    pub lang: String,
    pub url: String,
}

/// A normalized, playable (or extractable) stream candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamingSource {
    pub provider: Provider,
    pub url: String,
    /// Container/delivery type ("hls", "mp4", ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub quality: Option<String>,
    pub language: Language,
    pub display_name: String,
    pub origin: SourceKind,
    /// Only the flat `player_links` family carries subtitle tracks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<Subtitle>,
}

impl StreamingSource {
    /// Whether this is an HLS manifest rather than a progressive file
    pub fn is_hls(&self) -> bool {
        self.kind.eq_ignore_ascii_case("hls") || self.url.contains(".m3u8")
    }
}

impl fmt::Display for StreamingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}, {})",
            self.language, self.display_name, self.kind, self.origin
        )
    }
}

// =============================================================================
// Aggregation Models
// =============================================================================

/// How a single source fetch ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Answered in time; `count` is the number of normalized sources before filtering
    Succeeded { count: usize },
    /// Network failure, bad status, or undecodable body
    Failed { reason: String },
    /// Still pending when the deadline elapsed
    TimedOut,
}

impl FetchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchStatus::Succeeded { .. })
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Succeeded { count } => write!(f, "ok ({} sources)", count),
            FetchStatus::Failed { reason } => write!(f, "failed: {}", reason),
            FetchStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Diagnostic record for one source client in one aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReport {
    pub source: SourceKind,
    #[serde(flatten)]
    pub status: FetchStatus,
    pub elapsed_ms: u64,
}

/// Merged result of one fan-out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationOutcome {
    /// Allow-list filtered union of every source that answered in time
    pub sources: Vec<StreamingSource>,
    /// One entry per configured source client, in client order
    pub reports: Vec<ProviderReport>,
}

impl AggregationOutcome {
    /// Number of source clients that answered successfully
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.status.is_success()).count()
    }

    /// Report for a given source client, if it was part of the fan-out
    pub fn report(&self, source: SourceKind) -> Option<&ProviderReport> {
        self.reports.iter().find(|r| r.source == source)
    }
}
