//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the library services.
//! Each handler takes CLI args, the resolved config and Output, returns ExitCode.

use serde::Serialize;

use crate::aggregator::Aggregator;
use crate::cli::{ExitCode, ExtractCmd, Output, ProxyKind, ProxyUrlCmd, SourcesCmd};
use crate::config::Config;
use crate::extract::{vidmoly::VIDMOLY_ORIGIN, ExtractionError, ProviderExtractor};
use crate::models::{Language, MediaRequest, Provider, ProviderReport, StreamingSource};
use crate::proxy::ProxyUrlBuilder;

// =============================================================================
// Sources Command
// =============================================================================

pub async fn sources_cmd(cmd: SourcesCmd, config: &Config, output: &Output) -> ExitCode {
    let request = match cmd.media_request() {
        Ok(request) => request,
        Err(e) => return output.error(e, ExitCode::InvalidArgs),
    };

    let deadline = cmd
        .deadline
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.deadline());

    output.info(format!("Finding sources for: {}", request));

    let aggregator = Aggregator::from_config(config);
    let outcome = aggregator.fetch_outcome(&request, deadline).await;

    let language = cmd.lang.map(Language::from).or(config.preferred_language);
    let provider = cmd.provider.map(Provider::from);
    let sources = filter_sources(outcome.sources, language, provider.as_ref());

    if sources.is_empty() {
        // Every upstream failing is still "no sources", but worth telling apart
        let code = if outcome.reports.iter().all(|r| !r.status.is_success()) {
            ExitCode::NetworkError
        } else {
            ExitCode::NoSources
        };
        if cmd.report && !output.json {
            for report in &outcome.reports {
                output.info(format!("  {}: {}", report.source, report.status));
            }
        }
        return output.error(format!("No sources found for {}", request), code);
    }

    let indexed: Vec<IndexedSource> = sources
        .into_iter()
        .enumerate()
        .map(|(i, s)| IndexedSource {
            index: i,
            source: s,
        })
        .collect();

    let result = if cmd.report {
        output.print(SourcesReport {
            request,
            sources: indexed,
            reports: outcome.reports,
        })
    } else {
        output.print(&indexed)
    };

    if let Err(e) = result {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

/// Apply optional language and provider filters, keeping order
pub fn filter_sources(
    mut sources: Vec<StreamingSource>,
    language: Option<Language>,
    provider: Option<&Provider>,
) -> Vec<StreamingSource> {
    if let Some(language) = language {
        sources.retain(|s| s.language == language);
    }
    if let Some(provider) = provider {
        sources.retain(|s| &s.provider == provider);
    }
    sources
}

#[derive(Serialize)]
struct IndexedSource {
    index: usize,
    #[serde(flatten)]
    source: StreamingSource,
}

#[derive(Serialize)]
struct SourcesReport {
    request: MediaRequest,
    sources: Vec<IndexedSource>,
    reports: Vec<ProviderReport>,
}

// =============================================================================
// Extract Command
// =============================================================================

pub async fn extract_cmd(cmd: ExtractCmd, config: &Config, output: &Output) -> ExitCode {
    let extractor = ProviderExtractor::from_config(config);
    let provider = Provider::canonical(&cmd.provider);

    output.info(format!("Extracting {} source: {}", provider, cmd.url));

    match extractor.resolve(&cmd.url, &provider).await {
        Ok(result) => {
            let printed = if output.json {
                output.print(&result)
            } else {
                output.print_line(&result.url)
            };
            if let Err(e) = printed {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e @ ExtractionError::Request(_)) => {
            output.error(format!("Extraction failed: {}", e), ExitCode::NetworkError)
        }
        Err(e) => output.error(
            format!("Extraction failed: {}", e.reason()),
            ExitCode::ExtractionFailed,
        ),
    }
}

// =============================================================================
// Proxy URL Command
// =============================================================================

pub fn proxy_url_cmd(cmd: ProxyUrlCmd, config: &Config, output: &Output) -> ExitCode {
    let builder = ProxyUrlBuilder::new(config.base_url());

    let url = match cmd.kind {
        ProxyKind::Vidmoly => {
            builder.vidmoly(&cmd.url, cmd.referer.as_deref().unwrap_or(VIDMOLY_ORIGIN))
        }
        ProxyKind::Vixsrc => {
            if cmd.referer.is_some() {
                return output.error(
                    "--referer is only supported by the vidmoly proxy",
                    ExitCode::InvalidArgs,
                );
            }
            builder.vixsrc(&cmd.url)
        }
    };

    if let Err(e) = output.print_line(&url) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
