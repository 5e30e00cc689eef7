// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared status and result state machines.

use serde::{Deserialize, Serialize};

/// Scheduling status of a job, phase, or step.
///
/// Steps move `PendingAllocation → Allocated → (InProgress | Finished)`.
/// The heartbeat monitor adds the recovery edge `Allocated →
/// PendingAllocation` when an allocated step stops reporting liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Eligible for allocation by the external agent pool
    PendingAllocation,
    /// Claimed by an agent, expected to begin reporting within a deadline
    Allocated,
    /// Agent is reporting results
    InProgress,
    /// Terminal
    Finished,
}

impl Status {
    /// Check if work has been handed to an agent but is not yet done.
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Allocated | Status::InProgress)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Status::Finished)
    }
}

crate::simple_display! {
    Status {
        PendingAllocation => "pending_allocation",
        Allocated => "allocated",
        InProgress => "in_progress",
        Finished => "finished",
    }
}

/// Aggregate outcome of a step or target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    #[default]
    Unknown,
    Passed,
    Failed,
    /// Failed for infrastructure reasons (including chaos-injected failures)
    InfraFailed,
    Aborted,
}

crate::simple_display! {
    BuildResult {
        Unknown => "unknown",
        Passed => "passed",
        Failed => "failed",
        InfraFailed => "infra_failed",
        Aborted => "aborted",
    }
}

/// Where a recorded result came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// The entity's own execution produced the result
    #[default]
    FromSelf,
    /// Result propagated from a parent entity
    FromParent,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
