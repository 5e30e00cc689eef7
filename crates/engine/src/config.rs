// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side configuration consumed by the engine.

use serde::{Deserialize, Serialize};

fn default_allocation_timeout_secs() -> u64 {
    600
}

fn default_client_binary() -> String {
    "conveyor-client".to_string()
}

/// Static configuration of the orchestrating service.
///
/// The per-project half of a step lives in [`cv_plan::PlanConfig`]; this is
/// the half shared by every project the server builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Artifact server handed to execution agents
    pub artifacts_server: String,
    /// Base URL of this service's internal API
    pub api_base: String,
    /// Bucket snapshot images are stored in
    pub snapshot_bucket: String,
    /// Default pre-launch script (overridable per plan via debug config)
    #[serde(default)]
    pub pre_launch: String,
    /// Default post-launch script (overridable per plan via debug config)
    #[serde(default)]
    pub post_launch: String,
    /// Sentry DSN handed to agents for client-side error reporting
    #[serde(default)]
    pub client_sentry_dsn: Option<String>,
    /// Container template requested from the agent, when any
    #[serde(default)]
    pub dist_template: Option<String>,
    /// Base URL for bare git auxiliary-repo names
    #[serde(default)]
    pub git_base_url: Option<String>,
    /// Base URL for bare hg auxiliary-repo names
    #[serde(default)]
    pub hg_base_url: Option<String>,
    /// Seconds an allocated step may go without a heartbeat before it is
    /// returned to the allocation pool
    #[serde(default = "default_allocation_timeout_secs")]
    pub allocation_timeout_secs: u64,
    /// Execution agent binary used to build the allocation command line
    #[serde(default = "default_client_binary")]
    pub client_binary: String,
}

impl ServerConfig {
    /// Parse server configuration from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Absolute URL for an internal API path.
    pub fn internal_uri(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            artifacts_server: "https://artifacts.example.com".to_string(),
            api_base: "https://conveyor.example.com".to_string(),
            snapshot_bucket: "conveyor-snapshots".to_string(),
            pre_launch: String::new(),
            post_launch: String::new(),
            client_sentry_dsn: None,
            dist_template: None,
            git_base_url: None,
            hg_base_url: None,
            allocation_timeout_secs: default_allocation_timeout_secs(),
            client_binary: default_client_binary(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
