//! CLI - Command Line Interface for streamfan
//!
//! Scriptable front end over the aggregation and extraction library.
//! All output is JSON-parseable when `--json` is set or stdout is not a TTY.
//!
//! # Examples
//!
//! ```bash
//! # Sources for a movie (TMDB id)
//! streamfan sources 27205
//!
//! # Sources for an episode, VOSTFR only, with per-upstream report
//! streamfan sources 1399 -s 1 -e 3 --lang vostfr --report
//!
//! # Resolve a chosen source to a playable URL
//! streamfan extract "https://vidmoly.to/embed-abc.html" --provider vidmoly
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::logging::LogLevel;
use crate::models::{Language, MediaRequest, Provider};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// No sources available
    NoSources = 5,
    /// Extraction failed
    ExtractionFailed = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// streamfan - aggregate and resolve playable stream sources
#[derive(Parser, Debug)]
#[command(
    name = "streamfan",
    version,
    about = "Aggregate playable stream sources from several upstreams",
    long_about = "Queries every upstream source family concurrently for a movie or \
                  episode, normalizes the answers into one list, and resolves a \
                  chosen source into a directly playable URL.",
    after_help = "EXAMPLES:\n\
                  streamfan sources 27205                    Sources for a movie\n\
                  streamfan sources 1399 -s 1 -e 3 --report  Sources for an episode\n\
                  streamfan extract <url> --provider vidzy   Resolve a source"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log verbosity (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch sources for a movie or episode from every upstream
    #[command(visible_alias = "src")]
    Sources(SourcesCmd),

    /// Resolve a source URL into a directly playable URL
    #[command(visible_alias = "x")]
    Extract(ExtractCmd),

    /// Build a playback proxy URL
    #[command(visible_alias = "px")]
    ProxyUrl(ProxyUrlCmd),
}

// =============================================================================
// Sources Command
// =============================================================================

/// Fetch normalized sources for a movie or a series episode
#[derive(Args, Debug)]
pub struct SourcesCmd {
    /// TMDB id of the movie or series
    #[arg(required = true)]
    pub tmdb_id: u64,

    /// Season number (series only, requires --episode)
    #[arg(long, short = 's')]
    pub season: Option<u16>,

    /// Episode number (series only, requires --season)
    #[arg(long, short = 'e')]
    pub episode: Option<u16>,

    /// Keep only sources in this language
    #[arg(long, short = 'L', value_enum)]
    pub lang: Option<LanguageFilter>,

    /// Keep only sources from this provider
    #[arg(long, short = 'p', value_enum)]
    pub provider: Option<ProviderFilter>,

    /// Overall deadline in seconds (overrides config)
    #[arg(long, short = 'd')]
    pub deadline: Option<u64>,

    /// Include per-upstream fetch statuses in the output
    #[arg(long, short = 'r')]
    pub report: bool,
}

impl SourcesCmd {
    /// Build the media request; season and episode must come together
    pub fn media_request(&self) -> Result<MediaRequest, &'static str> {
        match (self.season, self.episode) {
            (None, None) => Ok(MediaRequest::movie(self.tmdb_id)),
            (Some(season), Some(episode)) => {
                Ok(MediaRequest::episode(self.tmdb_id, season, episode))
            }
            _ => Err("--season and --episode must be given together"),
        }
    }
}

/// Language filter for sources
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFilter {
    /// French dub
    Vf,
    /// Original audio, French subtitles
    Vostfr,
    /// Original audio
    Vo,
}

impl From<LanguageFilter> for Language {
    fn from(filter: LanguageFilter) -> Self {
        match filter {
            LanguageFilter::Vf => Language::Vf,
            LanguageFilter::Vostfr => Language::Vostfr,
            LanguageFilter::Vo => Language::Vo,
        }
    }
}

/// Provider filter for sources
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFilter {
    Vidmoly,
    Vidzy,
    Vixsrc,
}

impl From<ProviderFilter> for Provider {
    fn from(filter: ProviderFilter) -> Self {
        match filter {
            ProviderFilter::Vidmoly => Provider::Vidmoly,
            ProviderFilter::Vidzy => Provider::Vidzy,
            ProviderFilter::Vixsrc => Provider::Vixsrc,
        }
    }
}

// =============================================================================
// Extract Command
// =============================================================================

/// Resolve one source into a playable URL
#[derive(Args, Debug)]
pub struct ExtractCmd {
    /// Source URL as returned by `sources`
    #[arg(required = true)]
    pub url: String,

    /// Provider id of the source (unknown providers are passed through)
    #[arg(long, short = 'p', required = true)]
    pub provider: String,
}

// =============================================================================
// Proxy URL Command
// =============================================================================

/// Build a playback proxy URL for a target
#[derive(Args, Debug)]
pub struct ProxyUrlCmd {
    /// Upstream URL to wrap
    #[arg(required = true)]
    pub url: String,

    /// Which proxy endpoint to use
    #[arg(long, short = 'k', value_enum, default_value = "vidmoly")]
    pub kind: ProxyKind,

    /// Referer forwarded by the proxy (vidmoly only)
    #[arg(long, short = 'r')]
    pub referer: Option<String>,
}

/// Playback proxy endpoint
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyKind {
    #[default]
    Vidmoly,
    Vixsrc,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a single line of plain text (URLs), wrapped as JSON data in JSON mode
    pub fn print_line(&self, line: &str) -> anyhow::Result<()> {
        if self.json {
            self.print(line)
        } else {
            println!("{}", line);
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
