//! Vidzy extraction: one call to `/api/vidzy`, manifest used as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExtractionError, ExtractionResult, ProviderExtractor};

const EXTRACT_PATH: &str = "/api/vidzy";

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(rename = "m3u8Url")]
    m3u8_url: Option<String>,
    error: Option<String>,
}

pub(super) async fn extract(
    extractor: &ProviderExtractor,
    url: &str,
) -> Result<ExtractionResult, ExtractionError> {
    debug!("Extracting vidzy: {}", url);
    let response: ExtractResponse = extractor
        .post_json(EXTRACT_PATH, &ExtractRequest { url })
        .await?;

    if let Some(error) = response.error {
        return Err(ExtractionError::Provider(error));
    }

    match response.m3u8_url {
        Some(m3u8) if !m3u8.is_empty() => Ok(ExtractionResult {
            url: m3u8,
            method: None,
            proxied: false,
        }),
        _ => Err(ExtractionError::MissingStream),
    }
}
