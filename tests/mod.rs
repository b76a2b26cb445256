//! Integration tests for streamfan
//!
//! Tests are organized by component:
//! - sources_test: Upstream source clients (Movix TMDB, FStream, Vixsrc)
//! - aggregator_test: Fan-out, deadline, allow-list
//! - extract_test: Vidmoly/vidzy extraction and pass-through
//! - proxy_test: Proxy URL encoding round-trips
//! - cli_test: Argument parsing and command handlers

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
