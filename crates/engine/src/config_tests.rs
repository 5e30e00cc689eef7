// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_minimal_config() {
    let config = ServerConfig::from_toml_str(
        r#"
        artifacts_server = "https://artifacts.internal"
        api_base = "https://ci.internal"
        snapshot_bucket = "snapshots"
        "#,
    )
    .unwrap();

    assert_eq!(config.artifacts_server, "https://artifacts.internal");
    assert_eq!(config.allocation_timeout_secs, 600);
    assert_eq!(config.client_binary, "conveyor-client");
    assert!(config.client_sentry_dsn.is_none());
}

#[test]
fn internal_uri_joins_without_double_slash() {
    let config = ServerConfig {
        api_base: "https://ci.internal/".to_string(),
        ..ServerConfig::default()
    };
    assert_eq!(config.internal_uri("/api/0/"), "https://ci.internal/api/0/");

    let config = ServerConfig {
        api_base: "https://ci.internal".to_string(),
        ..ServerConfig::default()
    };
    assert_eq!(config.internal_uri("/api/0/"), "https://ci.internal/api/0/");
}
