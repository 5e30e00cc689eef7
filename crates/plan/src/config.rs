// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-plan configuration definitions.

use crate::debug::DebugConfig;
use crate::error::PlanError;
use cv_core::{CommandType, VcsKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_release() -> String {
    "precise".to_string()
}

fn default_max_executors() -> u32 {
    10
}

fn default_cpus() -> u32 {
    4
}

fn default_memory() -> u32 {
    8192
}

fn default_true() -> bool {
    true
}

/// One user-declared command in a build plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub script: String,
    /// Pipeline role; plain `command` when unspecified
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    /// Working directory, relative to the plan's default path unless absolute
    #[serde(default)]
    pub path: Option<String>,
    /// Extra environment overlaid on the plan's base env
    #[serde(default)]
    pub env: Option<IndexMap<String, String>>,
    /// Artifact globs; the plan's default set when unspecified
    #[serde(default)]
    pub artifacts: Option<Vec<String>>,
}

/// An auxiliary repository checked out alongside the primary source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherRepoConfig {
    /// Full URL, or a bare name resolved against the configured base URL
    pub repo: String,
    /// Clone destination
    pub path: String,
    #[serde(default)]
    pub backend: VcsKind,
    /// Revision to check out; backend-specific default when unspecified
    #[serde(default)]
    pub revision: Option<String>,
}

impl OtherRepoConfig {
    pub fn revision(&self) -> &str {
        self.revision
            .as_deref()
            .unwrap_or_else(|| self.backend.default_revision())
    }

    /// Resolve the clone URL. A bare name (no scheme, no `@`) needs a
    /// configured base URL; without one it is a configuration error.
    pub fn remote_url(&self, base_url: Option<&str>) -> Result<String, PlanError> {
        if self.repo.contains("://") || self.repo.contains('@') {
            return Ok(self.repo.clone());
        }
        match base_url {
            Some(base) => Ok(format!("{}{}", base, self.repo)),
            None => Err(PlanError::BareRepoWithoutBase {
                repo: self.repo.clone(),
            }),
        }
    }
}

/// The full user-declared half of a build step.
///
/// Integer typing is enforced by deserialization; structural rules by
/// [`validate`](PlanConfig::validate). Both run before any job is planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Commands to run, in declared order. Required.
    pub commands: Vec<CommandConfig>,
    /// Where to check the primary repository out to
    #[serde(default)]
    pub repo_path: Option<String>,
    /// Default working directory for commands, relative to `repo_path`
    /// unless absolute. Each defaults to the other when only one is set.
    #[serde(default)]
    pub path: Option<String>,
    /// Base environment; replaces the built-in default env when set
    #[serde(default)]
    pub env: Option<IndexMap<String, String>>,
    /// Default artifact globs for commands that declare none
    #[serde(default)]
    pub artifacts: Option<Vec<String>>,
    /// Release channel requested from the execution agent
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(default = "default_max_executors")]
    pub max_executors: u32,
    #[serde(default = "default_cpus")]
    pub cpus: u32,
    /// Memory limit in megabytes
    #[serde(default = "default_memory")]
    pub memory: u32,
    /// Clean the repository before building
    #[serde(default = "default_true")]
    pub clean: bool,
    /// Restrict allocation to agents of this cluster
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub other_repos: Vec<OtherRepoConfig>,
    /// Where the agent searches for artifacts; defaults to the command path
    #[serde(default)]
    pub artifact_search_path: Option<String>,
    /// Append a hash of the file path to collected artifact names
    #[serde(default)]
    pub use_path_in_artifact_name: bool,
    /// Suffix inserted into collected artifact names (e.g. ".bazel")
    #[serde(default)]
    pub artifact_suffix: String,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl PlanConfig {
    /// Parse and validate a plan from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, PlanError> {
        let config: PlanConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.commands.is_empty() {
            return Err(PlanError::MissingCommands);
        }
        for (index, command) in self.commands.iter().enumerate() {
            if command.script.trim().is_empty() {
                return Err(PlanError::EmptyScript { index });
            }
        }
        for (index, repo) in self.other_repos.iter().enumerate() {
            if repo.repo.trim().is_empty() {
                return Err(PlanError::OtherRepoMissingRepo { index });
            }
            if repo.path.trim().is_empty() {
                return Err(PlanError::OtherRepoMissingPath { index });
            }
        }
        Ok(())
    }

    /// True when any declared command is a collector.
    pub fn has_collector(&self) -> bool {
        self.commands.iter().any(|c| c.kind.is_collector())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
