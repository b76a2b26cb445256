//! streamfan - multi-source stream aggregation and provider extraction
//!
//! Queries several independent upstream source families concurrently for a
//! movie or episode, normalizes their answers into one [`StreamingSource`]
//! model, and resolves a chosen source into a directly playable URL.
//!
//! # Modules
//!
//! - `models` - Requests, sources, aggregation reports
//! - `api` - Upstream source clients (Movix TMDB, FStream, Vixsrc)
//! - `normalize` - Wire payloads to `StreamingSource`
//! - `aggregator` - Concurrent fan-out with a single deadline
//! - `extract` - Per-provider extraction (vidmoly, vidzy)
//! - `proxy` - Playback proxy URL construction
//! - `config`, `logging`, `cli`, `commands` - Command-line front end

pub mod models;
pub mod api;
pub mod normalize;
pub mod aggregator;
pub mod extract;
pub mod proxy;
pub mod config;
pub mod logging;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{
    AggregationOutcome, FetchStatus, Language, MediaRequest, Provider, ProviderReport,
    SourceKind, StreamingSource, Subtitle,
};

pub use aggregator::Aggregator;
pub use api::{FStreamClient, MovixTmdbClient, SourceClient, SourceFetchError, VixsrcClient};
pub use config::Config;
pub use extract::{ExtractionError, ExtractionResult, ProviderExtractor};
pub use proxy::ProxyUrlBuilder;
