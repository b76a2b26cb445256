//! CLI Command Tests
//!
//! Argument parsing, exit codes, and the handlers that need no network.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::Parser;
    use streamfan::cli::{Cli, Command, LanguageFilter, ProviderFilter, ProxyKind};
    use streamfan::logging::LogLevel;
    use streamfan::models::MediaRequest;

    #[test]
    fn test_sources_episode_with_filters() {
        let cli = Cli::parse_from([
            "streamfan",
            "sources",
            "1399",
            "-s",
            "1",
            "-e",
            "3",
            "--lang",
            "vostfr",
            "--provider",
            "vidmoly",
            "--deadline",
            "4",
            "--report",
        ]);
        match cli.command {
            Command::Sources(cmd) => {
                assert_eq!(cmd.media_request(), Ok(MediaRequest::episode(1399, 1, 3)));
                assert_eq!(cmd.lang, Some(LanguageFilter::Vostfr));
                assert_eq!(cmd.provider, Some(ProviderFilter::Vidmoly));
                assert_eq!(cmd.deadline, Some(4));
                assert!(cmd.report);
            }
            _ => panic!("Expected Sources command"),
        }
    }

    #[test]
    fn test_sources_alias() {
        let cli = Cli::parse_from(["streamfan", "src", "550"]);
        assert!(matches!(cli.command, Command::Sources(_)));
    }

    #[test]
    fn test_sources_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["streamfan", "sources", "fight-club"]).is_err());
    }

    #[test]
    fn test_extract_requires_provider() {
        assert!(Cli::try_parse_from(["streamfan", "extract", "https://vidzy.org/e/1"]).is_err());

        let cli = Cli::parse_from([
            "streamfan",
            "x",
            "https://vidzy.org/e/1",
            "--provider",
            "Vidzy",
        ]);
        match cli.command {
            Command::Extract(cmd) => {
                assert_eq!(cmd.url, "https://vidzy.org/e/1");
                assert_eq!(cmd.provider, "Vidzy");
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_proxy_url_defaults_to_vidmoly() {
        let cli = Cli::parse_from(["streamfan", "proxy-url", "https://cdn/m.m3u8"]);
        match cli.command {
            Command::ProxyUrl(cmd) => {
                assert_eq!(cmd.kind, ProxyKind::Vidmoly);
                assert!(cmd.referer.is_none());
            }
            _ => panic!("Expected ProxyUrl command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "streamfan",
            "sources",
            "550",
            "--json",
            "--base-url",
            "http://localhost:3000",
            "--log-level",
            "debug",
        ]);
        assert!(cli.json);
        assert!(cli.should_json());
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}

// =============================================================================
// Handler Tests
// =============================================================================

mod handlers {
    use streamfan::cli::{ExitCode, ExtractCmd, Output, ProxyKind, ProxyUrlCmd, SourcesCmd};
    use streamfan::commands;
    use streamfan::config::Config;

    fn output() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn config(base_url: &str) -> Config {
        Config {
            base_url: Some(base_url.to_string()),
            deadline_secs: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_proxy_url_vixsrc_rejects_referer() {
        let cmd = ProxyUrlCmd {
            url: "https://cdn/m.m3u8".to_string(),
            kind: ProxyKind::Vixsrc,
            referer: Some("https://vidmoly.net/".to_string()),
        };
        let code = commands::proxy_url_cmd(cmd, &config("https://svc.example"), &output());
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[test]
    fn test_proxy_url_vidmoly_succeeds() {
        let cmd = ProxyUrlCmd {
            url: "https://cdn/m.m3u8".to_string(),
            kind: ProxyKind::Vidmoly,
            referer: None,
        };
        let code = commands::proxy_url_cmd(cmd, &config("https://svc.example"), &output());
        assert_eq!(code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_sources_half_episode_is_invalid() {
        let cmd = SourcesCmd {
            tmdb_id: 1399,
            season: Some(1),
            episode: None,
            lang: None,
            provider: None,
            deadline: None,
            report: false,
        };
        let code = commands::sources_cmd(cmd, &config("http://127.0.0.1:9"), &output()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_sources_no_sources_exit_code() {
        let mut server = mockito::Server::new_async().await;
        let _movix = server
            .mock("GET", "/api/movix-proxy")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"player_links": [], "players": {}}"#)
            .create_async()
            .await;
        let _vixsrc = server
            .mock("GET", "/api/vixsrc")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": true, "streams": []}"#)
            .create_async()
            .await;

        let cmd = SourcesCmd {
            tmdb_id: 550,
            season: None,
            episode: None,
            lang: None,
            provider: None,
            deadline: None,
            report: false,
        };
        let code = commands::sources_cmd(cmd, &config(&server.url()), &output()).await;
        assert_eq!(code, ExitCode::NoSources);
    }

    #[tokio::test]
    async fn test_extract_failure_exit_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/vidzy")
            .with_status(200)
            .with_body(r#"{"error": "gone"}"#)
            .create_async()
            .await;

        let cmd = ExtractCmd {
            url: "https://vidzy.org/e/1".to_string(),
            provider: "vidzy".to_string(),
        };
        let code = commands::extract_cmd(cmd, &config(&server.url()), &output()).await;
        assert_eq!(code, ExitCode::ExtractionFailed);
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

#[test]
fn test_exit_code_values() {
    use streamfan::cli::ExitCode;
    assert_eq!(i32::from(ExitCode::Error), 1);
    assert_eq!(i32::from(ExitCode::NetworkError), 3);
    assert_eq!(i32::from(ExitCode::NoSources), 5);
    assert_eq!(i32::from(ExitCode::ExtractionFailed), 7);
}
