// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands: the ordered executable actions within a step.
//!
//! A [`CommandTemplate`] describes one action before any step exists to own
//! it; the planner assembles the full template list for a build and the
//! allocator materializes the surviving templates as [`Command`]s with a
//! dense, zero-based order.

use crate::id::{CommandId, StepId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Role of a command within the step pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Generated setup (checkout, patch, blacklist removal); never user-declared
    InfraSetup,
    /// User-declared setup
    Setup,
    /// Ordinary build/test command
    #[default]
    Command,
    /// Discovers work to expand into child steps (e.g. test collection)
    Collect,
    /// Runs last, regardless of earlier failures
    Teardown,
}

impl CommandType {
    /// Setup-class commands run before expanded child commands.
    pub fn is_setup(self) -> bool {
        matches!(self, CommandType::InfraSetup | CommandType::Setup)
    }

    pub fn is_collector(self) -> bool {
        matches!(self, CommandType::Collect)
    }

    /// Every command type runs in an ordinary build.
    pub fn is_valid_for_default(self) -> bool {
        true
    }

    /// Snapshot-capture builds run everything except collection commands.
    pub fn is_valid_for_snapshot(self) -> bool {
        !self.is_collector()
    }

    /// Collection runs keep environment preparation and the collectors;
    /// ordinary build/test commands and teardown are dropped.
    pub fn is_valid_for_collection(self) -> bool {
        self.is_setup() || self.is_collector()
    }
}

crate::simple_display! {
    CommandType {
        InfraSetup => "infra_setup",
        Setup => "setup",
        Command => "command",
        Collect => "collect",
        Teardown => "teardown",
    }
}

/// An executable action not yet bound to a step.
///
/// Immutable-until-materialized: the planner may still fill defaults
/// (path, env, artifacts), but once converted via [`into_command`] the
/// action is owned by exactly one step.
///
/// [`into_command`]: CommandTemplate::into_command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    pub script: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub env: IndexMap<String, String>,
    /// Artifact glob patterns this command is expected to produce
    #[serde(default)]
    pub artifacts: Vec<String>,
}

impl CommandTemplate {
    pub fn new(kind: CommandType, script: impl Into<String>) -> Self {
        Self {
            kind,
            script: script.into(),
            path: None,
            env: IndexMap::new(),
            artifacts: Vec::new(),
        }
    }

    /// A generated infrastructure-setup template.
    pub fn infra(script: impl Into<String>) -> Self {
        Self::new(CommandType::InfraSetup, script)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_env(mut self, env: IndexMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Rebuild a template from an already-persisted command, preserving its
    /// recorded type/script/path/env/artifacts. Used when re-materializing
    /// a failed expanded step whose pipeline is already embedded.
    pub fn from_command(command: &Command) -> Self {
        Self {
            kind: command.kind,
            script: command.script.clone(),
            path: command.path.clone(),
            env: command.env.clone(),
            artifacts: command.artifacts.clone(),
        }
    }

    /// Bind this template to a step at the given position.
    ///
    /// Order-preserving and injective: each template yields exactly one
    /// command, and callers assign `order` from the final (post-filter)
    /// sequence so orders are dense and zero-based per step.
    pub fn into_command(self, step_id: StepId, order: u32) -> Command {
        Command {
            id: CommandId::new(),
            step_id,
            kind: self.kind,
            script: self.script,
            path: self.path,
            env: self.env,
            artifacts: self.artifacts,
            order,
        }
    }
}

/// One executable action owned by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    pub step_id: StepId,
    #[serde(rename = "type")]
    pub kind: CommandType,
    pub script: String,
    pub path: Option<String>,
    pub env: IndexMap<String, String>,
    pub artifacts: Vec<String>,
    /// Execution position within the step; dense and zero-based
    pub order: u32,
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
