//! Response normalization
//!
//! Maps each upstream family's native payload into [`StreamingSource`].
//! The wire structs here are public so payloads can be normalized without
//! going through HTTP (fixtures, replays).
//!
//! - Family A (`player_links`): entries pass through, provider and language canonicalized
//! - Family B (`players` / `episodes`): language-keyed player arrays
//! - Family C (vixsrc `streams`): every URL re-wrapped behind our proxy

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{Language, MediaRequest, Provider, SourceKind, StreamingSource, Subtitle};
use crate::proxy::ProxyUrlBuilder;

// =============================================================================
// Family A: flat player_links list
// =============================================================================

/// Catalog proxy response carrying ready-formed sources
#[derive(Debug, Default, Deserialize)]
pub struct PlayerLinksPayload {
    #[serde(default)]
    pub player_links: Option<Vec<PlayerLink>>,
    /// Series responses may nest the links of the requested episode here
    #[serde(default)]
    pub current_episode: Option<CurrentEpisode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentEpisode {
    #[serde(default)]
    pub player_links: Option<Vec<PlayerLink>>,
}

/// One entry of `player_links`
#[derive(Debug, Default, Deserialize)]
pub struct PlayerLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub decoded_url: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subtitles: Option<Vec<SubtitleLink>>,
}

/// Subtitle track as listed under a `player_links` entry
#[derive(Debug, Default, Deserialize)]
pub struct SubtitleLink {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SubtitleLink {
    fn into_subtitle(self) -> Option<Subtitle> {
        Some(Subtitle {
            url: non_empty(self.url)?,
            lang: self.lang.unwrap_or_default(),
        })
    }
}

impl PlayerLink {
    fn into_source(self) -> Option<StreamingSource> {
        let url = non_empty(self.decoded_url).or_else(|| non_empty(self.url))?;
        let provider = self
            .provider
            .as_deref()
            .map(Provider::canonical)
            .unwrap_or_else(|| Provider::Other("other".to_string()));
        let quality = non_empty(self.quality);
        let display_name =
            non_empty(self.name).unwrap_or_else(|| display_name(&provider, quality.as_deref()));

        Some(StreamingSource {
            kind: self.kind.unwrap_or_else(|| infer_kind(&url).to_string()),
            language: self
                .language
                .as_deref()
                .map(Language::from_label)
                .unwrap_or_default(),
            provider,
            url,
            quality,
            display_name,
            origin: SourceKind::MovixTmdb,
            subtitles: self
                .subtitles
                .unwrap_or_default()
                .into_iter()
                .filter_map(SubtitleLink::into_subtitle)
                .collect(),
        })
    }
}

/// Normalize a Family A payload.
///
/// `current_episode.player_links` wins over top-level `player_links` when it
/// is present and non-empty.
pub fn normalize_player_links(payload: PlayerLinksPayload) -> Vec<StreamingSource> {
    let links = match payload.current_episode.and_then(|e| e.player_links) {
        Some(links) if !links.is_empty() => links,
        _ => payload.player_links.unwrap_or_default(),
    };

    links
        .into_iter()
        .filter_map(PlayerLink::into_source)
        .collect()
}

// =============================================================================
// Family B: language-keyed player map
// =============================================================================

/// FStream response, either movie-shaped (`players`) or season-shaped (`episodes`)
#[derive(Debug, Default, Deserialize)]
pub struct FStreamPayload {
    #[serde(default)]
    pub players: Option<BTreeMap<String, Vec<PlayerEntry>>>,
    #[serde(default)]
    pub episodes: Option<BTreeMap<String, FStreamEpisode>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FStreamEpisode {
    #[serde(default)]
    pub number: Option<u16>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, Vec<PlayerEntry>>>,
}

/// One player entry under a language key. Entries without a URL or a
/// player name are skipped, not fatal to the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
}

/// Normalize a Family B payload for the given request.
///
/// Movies read `players`. Series pick the requested episode out of
/// `episodes`, by map key first and by `number` second; a season payload
/// without `episodes` falls back to `players`. A missing episode is not an
/// error, it just has no sources.
pub fn normalize_fstream(payload: FStreamPayload, request: &MediaRequest) -> Vec<StreamingSource> {
    let players = match request.season_episode() {
        None => payload.players,
        Some((_, episode)) => match payload.episodes {
            Some(mut episodes) => select_episode(&mut episodes, episode).and_then(|e| e.languages),
            None => payload.players,
        },
    };

    players
        .map(|map| {
            map.into_iter()
                .flat_map(|(key, entries)| {
                    let language = Language::from_player_key(&key);
                    entries
                        .into_iter()
                        .filter_map(move |entry| player_entry_source(entry, language))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn select_episode(
    episodes: &mut BTreeMap<String, FStreamEpisode>,
    episode: u16,
) -> Option<FStreamEpisode> {
    if let Some(found) = episodes.remove(&episode.to_string()) {
        return Some(found);
    }
    let key = episodes
        .iter()
        .find(|(_, e)| e.number == Some(episode))
        .map(|(k, _)| k.clone())?;
    episodes.remove(&key)
}

fn player_entry_source(entry: PlayerEntry, language: Language) -> Option<StreamingSource> {
    let url = non_empty(entry.url)?;
    let provider = Provider::canonical(&non_empty(entry.player)?);
    let quality = non_empty(entry.quality);

    Some(StreamingSource {
        display_name: display_name(&provider, quality.as_deref()),
        kind: entry.kind.unwrap_or_else(|| infer_kind(&url).to_string()),
        provider,
        url,
        quality,
        language,
        origin: SourceKind::FStream,
        subtitles: Vec::new(),
    })
}

// =============================================================================
// Family C: vixsrc raw streams
// =============================================================================

/// Vixsrc endpoint response
#[derive(Debug, Default, Deserialize)]
pub struct VixsrcPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub streams: Option<Vec<VixsrcStream>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VixsrcStream {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Normalize a Family C stream list; every URL is wrapped behind the vixsrc proxy
pub fn normalize_vixsrc(streams: Vec<VixsrcStream>, proxy: &ProxyUrlBuilder) -> Vec<StreamingSource> {
    streams
        .into_iter()
        .filter_map(|s| {
            let upstream = non_empty(s.url)?;
            let quality = non_empty(s.quality);
            Some(StreamingSource {
                url: proxy.vixsrc(&upstream),
                kind: s.kind.unwrap_or_else(|| infer_kind(&upstream).to_string()),
                display_name: display_name(&Provider::Vixsrc, quality.as_deref()),
                provider: Provider::Vixsrc,
                quality,
                language: Language::Vo,
                origin: SourceKind::Vixsrc,
                subtitles: Vec::new(),
            })
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// `Capitalize(provider)` plus `" - quality"` when quality is non-empty
pub fn display_name(provider: &Provider, quality: Option<&str>) -> String {
    match quality {
        Some(q) if !q.is_empty() => format!("{} - {}", provider.label(), q),
        _ => provider.label(),
    }
}

fn infer_kind(url: &str) -> &'static str {
    if url.contains(".m3u8") {
        "hls"
    } else {
        "mp4"
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, quality: &str) -> PlayerEntry {
        PlayerEntry {
            url: Some(format!("https://{}.example/e/abc", player.to_lowercase())),
            kind: Some("embed".to_string()),
            quality: Some(quality.to_string()),
            player: Some(player.to_string()),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&Provider::Vidmoly, Some("1080p")), "Vidmoly - 1080p");
        assert_eq!(display_name(&Provider::Vidzy, Some("")), "Vidzy");
        assert_eq!(display_name(&Provider::Vixsrc, None), "Vixsrc");
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(infer_kind("https://cdn/x/master.m3u8?t=1"), "hls");
        assert_eq!(infer_kind("https://cdn/x/movie.mp4"), "mp4");
    }

    #[test]
    fn test_player_link_prefers_decoded_url() {
        let link = PlayerLink {
            url: Some("https://enc.example/x".to_string()),
            decoded_url: Some("https://vidmoly.to/embed-1.html".to_string()),
            provider: Some("VidMoly".to_string()),
            ..Default::default()
        };
        let source = link.into_source().unwrap();
        assert_eq!(source.url, "https://vidmoly.to/embed-1.html");
        assert_eq!(source.provider, Provider::Vidmoly);
        assert_eq!(source.kind, "mp4");
        assert_eq!(source.language, Language::Vf);
        assert_eq!(source.display_name, "Vidmoly");
    }

    #[test]
    fn test_player_link_without_url_is_dropped() {
        let link = PlayerLink {
            provider: Some("vidzy".to_string()),
            ..Default::default()
        };
        assert!(link.into_source().is_none());
    }

    #[test]
    fn test_select_episode_by_number() {
        let mut episodes = BTreeMap::new();
        episodes.insert(
            "ep-03".to_string(),
            FStreamEpisode {
                number: Some(3),
                languages: None,
            },
        );
        assert!(select_episode(&mut episodes, 3).is_some());
        assert!(select_episode(&mut episodes, 4).is_none());
    }

    #[test]
    fn test_fstream_movie_keeps_entry_order_within_key() {
        let mut players = BTreeMap::new();
        players.insert(
            "VF".to_string(),
            vec![entry("Vidzy", "720p"), entry("VidMoly", "1080p")],
        );
        let payload = FStreamPayload {
            players: Some(players),
            episodes: None,
        };

        let sources = normalize_fstream(payload, &MediaRequest::movie(1));
        let providers: Vec<_> = sources.iter().map(|s| s.provider.clone()).collect();
        assert_eq!(providers, vec![Provider::Vidzy, Provider::Vidmoly]);
    }
}
