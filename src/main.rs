//! streamfan - aggregate and resolve playable stream sources
//!
//! # Usage
//!
//! ```bash
//! streamfan sources 27205
//! streamfan sources 1399 -s 1 -e 3 --lang vostfr
//! streamfan extract "https://vidmoly.to/embed-abc.html" --provider vidmoly
//! ```

use clap::Parser;

use streamfan::cli::{Cli, Command, ExitCode, Output};
use streamfan::commands;
use streamfan::config::Config;
use streamfan::logging;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    run_cli(cli).await.into()
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let mut config = match cli.config.as_deref() {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        },
        None => Config::load(),
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }

    match cli.command {
        Command::Sources(cmd) => commands::sources_cmd(cmd, &config, &output).await,
        Command::Extract(cmd) => commands::extract_cmd(cmd, &config, &output).await,
        Command::ProxyUrl(cmd) => commands::proxy_url_cmd(cmd, &config, &output),
    }
}
