// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The build-step capability interface.

use crate::error::EngineError;
use cv_core::{CommandTemplate, Job, Step};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Artifact handler types registered for a step's results.
///
/// Ingestion itself happens elsewhere; the engine only declares which
/// handlers apply and which filename globs they collect by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactHandler {
    Xunit,
    Coverage,
    AnalyticsJson,
    BazelTarget,
}

impl ArtifactHandler {
    /// Filename globs this handler collects when a command declares none.
    pub fn filename_patterns(self) -> &'static [&'static str] {
        match self {
            ArtifactHandler::Xunit => &["xunit.xml", "*.xunit.xml"],
            ArtifactHandler::Coverage => &["coverage.xml", "*.coverage.xml"],
            ArtifactHandler::AnalyticsJson => &["analytics.json", "*.analytics.json"],
            // Target results arrive through the reporting API, not file globs
            ArtifactHandler::BazelTarget => &[],
        }
    }
}

/// Resource requirements declared for the external allocator to honor.
///
/// Conveyor does no bin-packing of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub cpus: u32,
    /// Megabytes
    pub memory: u32,
}

/// Capability interface of a build-step kind.
///
/// [`DefaultBuildStep`](crate::DefaultBuildStep) is the standard
/// implementation; alternative execution adapters implement the same
/// seam.
pub trait BuildStep: Send + Sync {
    /// Human-readable label for this step kind.
    fn label(&self) -> String;

    /// The full, ordered command-template list for a job, before any
    /// cause-specific filtering.
    fn plan_commands(&self, job: &Job) -> Vec<CommandTemplate>;

    /// Create (or idempotently fetch) the job's phase and step and
    /// materialize its filtered commands.
    fn allocate(&self, job: &mut Job) -> Result<Step, EngineError>;

    /// Periodic per-step maintenance; reclaims steps whose agent stalled.
    fn update_step(&self, step: &mut Step);

    /// Acknowledge cancellation of a step.
    fn cancel_step(&self, step: &mut Step);

    /// The flag set handed to the execution agent for a step.
    fn allocation_params(&self, step: &Step) -> IndexMap<String, String>;

    /// Handler types registered for this step kind's artifacts.
    fn artifact_handlers(&self) -> Vec<ArtifactHandler>;
}

#[cfg(test)]
#[path = "buildstep_tests.rs"]
mod tests;
