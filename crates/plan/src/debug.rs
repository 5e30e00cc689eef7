// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debug configuration: switches for resilience testing and hacky features.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Debug and chaos switches carried by a build plan.
///
/// `infra_failures` maps a phase tag (`"primary"` or `"expanded"`) to the
/// probability that a step created in that phase is marked for a forced
/// infrastructure failure. A missing tag means probability zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    #[serde(default)]
    pub infra_failures: IndexMap<String, f64>,
    /// Overrides the server's default pre-launch script
    #[serde(default)]
    pub prelaunch_script: Option<String>,
    /// Overrides the server's default post-launch script
    #[serde(default)]
    pub postlaunch_script: Option<String>,
    /// Extra filesystem mounts passed to the execution agent
    #[serde(default)]
    pub bind_mounts: Option<String>,
    /// Prefer the artifact store over direct agent uploads during sync
    #[serde(default = "default_true")]
    pub prefer_artifactstore: bool,
    /// Directory on the build machine holding pre-warmed repository caches
    #[serde(default)]
    pub repo_cache_dir: Option<String>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            infra_failures: IndexMap::new(),
            prelaunch_script: None,
            postlaunch_script: None,
            bind_mounts: None,
            prefer_artifactstore: true,
            repo_cache_dir: None,
        }
    }
}

impl DebugConfig {
    /// Forced-failure probability for a phase tag; zero when unconfigured.
    pub fn failure_probability(&self, phase: &str) -> f64 {
        self.infra_failures.get(phase).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
