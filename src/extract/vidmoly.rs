//! Vidmoly extraction
//!
//! 1. Inputs that already look like a manifest (or sit on a known CDN)
//!    skip the extraction endpoint.
//! 2. Otherwise POST `{url, mode: "auto"}` to `/api/vidmoly`.
//! 3. The answer must carry `success: true` and an `m3u8Url`; comma-mangled
//!    `.urlset` multivariant URLs are cleaned.
//! 4. Real vidmoly manifests are wrapped behind our proxy with a referer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExtractionError, ExtractionResult, ProviderExtractor};

const EXTRACT_PATH: &str = "/api/vidmoly";

/// Referer sent with manifests that never went through the extraction endpoint
pub const VIDMOLY_ORIGIN: &str = "https://vidmoly.net/";

/// Hostnames whose URLs are already playable manifests
const PRE_EXTRACTED_HOSTS: [&str; 2] = ["unified-streaming.com", "vmeas.cloud"];

/// Hostnames of the real vidmoly CDN, which needs the referer proxy
const REAL_CDN_HOSTS: [&str; 2] = ["vmwesa.online", "vmeas.cloud"];

/// Method tags reported when the endpoint found the real master playlist
const PROXIED_METHODS: [&str; 2] = ["extracted_real", "direct_master_m3u8"];
const PROXIED_METHOD_PREFIX: &str = "direct_pattern_";

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
    mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "m3u8Url")]
    m3u8_url: Option<String>,
    method: Option<String>,
}

/// Whether the input can skip the extraction endpoint
pub fn is_pre_extracted(url: &str) -> bool {
    url.contains(".m3u8") || PRE_EXTRACTED_HOSTS.iter().any(|host| url.contains(host))
}

/// Strip commas from `.urlset` manifests; anything else is returned untouched
pub fn clean_m3u8_url(url: &str) -> String {
    if url.contains(',') && url.contains(".urlset") {
        url.replace(',', "")
    } else {
        url.to_string()
    }
}

/// Whether an extracted manifest must be routed through the vidmoly proxy
pub fn needs_proxy(method: Option<&str>, url: &str) -> bool {
    let by_method = method.is_some_and(|m| {
        PROXIED_METHODS.contains(&m) || m.starts_with(PROXIED_METHOD_PREFIX)
    });
    by_method || REAL_CDN_HOSTS.iter().any(|host| url.contains(host))
}

pub(super) async fn extract(
    extractor: &ProviderExtractor,
    url: &str,
) -> Result<ExtractionResult, ExtractionError> {
    if is_pre_extracted(url) {
        debug!("Vidmoly URL is pre-extracted, proxying directly: {}", url);
        return Ok(ExtractionResult {
            url: extractor.proxy().vidmoly(url, VIDMOLY_ORIGIN),
            method: None,
            proxied: true,
        });
    }

    debug!("Extracting vidmoly: {}", url);
    let response: ExtractResponse = extractor
        .post_json(EXTRACT_PATH, &ExtractRequest { url, mode: "auto" })
        .await?;

    let m3u8_url = match response.m3u8_url {
        Some(u) if response.success && !u.is_empty() => u,
        _ => return Err(ExtractionError::MissingStream),
    };

    let cleaned = clean_m3u8_url(&m3u8_url);
    let method = response.method;

    if needs_proxy(method.as_deref(), &cleaned) {
        debug!("Vidmoly manifest needs proxy (method: {:?})", method);
        Ok(ExtractionResult {
            url: extractor.proxy().vidmoly(&cleaned, url),
            method,
            proxied: true,
        })
    } else {
        Ok(ExtractionResult {
            url: cleaned,
            method,
            proxied: false,
        })
    }
}
