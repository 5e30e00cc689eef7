// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phases and steps: the schedulable units of a job.

use crate::id::{JobId, PhaseId, StepId};
use crate::status::Status;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named grouping of steps within a job.
///
/// Uniqueness is keyed by (job, label): repeated allocation attempts for
/// the same label converge on one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub job_id: JobId,
    pub label: String,
    pub status: Status,
}

/// Structured step attributes.
///
/// The first field block is the set copied from a parent step to its
/// expanded children (only where the child left the field unset); the
/// second block is operational state that never crosses the parent/child
/// boundary. Unknown fields from other writers round-trip through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_search_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_executors: Option<u32>,
    /// True for steps created by runtime expansion of a parent step
    #[serde(default)]
    pub expanded: bool,
    /// Execution node the failed predecessor ran on; best-effort anti-affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_node: Option<String>,
    /// Target name → files that affected it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_map: Option<IndexMap<String, Vec<String>>>,
    /// Set by chaos injection; the agent reports an infrastructure failure
    #[serde(default)]
    pub force_infra_failure: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl StepData {
    /// Copy inheritable fields from a parent step's data, keeping any value
    /// this data has already set (child wins on conflict).
    pub fn inherit_from(&mut self, parent: &StepData) {
        if self.release.is_none() {
            self.release.clone_from(&parent.release);
        }
        if self.cpus.is_none() {
            self.cpus = parent.cpus;
        }
        if self.memory.is_none() {
            self.memory = parent.memory;
        }
        if self.weight.is_none() {
            self.weight = parent.weight;
        }
        if self.tests.is_none() {
            self.tests.clone_from(&parent.tests);
        }
        if self.shard_count.is_none() {
            self.shard_count = parent.shard_count;
        }
        if self.artifact_search_path.is_none() {
            self.artifact_search_path
                .clone_from(&parent.artifact_search_path);
        }
        if self.targets.is_none() {
            self.targets.clone_from(&parent.targets);
        }
    }
}

/// The atomic schedulable unit: the allocation target for an execution agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub phase_id: PhaseId,
    pub job_id: JobId,
    pub label: String,
    pub status: Status,
    /// Restricts allocation to agents of this cluster
    pub cluster: Option<String>,
    /// Execution node assigned by the external allocator
    pub node: Option<String>,
    /// Last liveness report from the executing agent (epoch ms)
    pub last_heartbeat_ms: Option<u64>,
    /// Successor step created by failure recovery; at most one, never cyclic
    pub replacement_id: Option<StepId>,
    pub data: StepData,
}

impl Step {
    pub fn record_heartbeat(&mut self, epoch_ms: u64) {
        self.last_heartbeat_ms = Some(epoch_ms);
    }
}

crate::builder! {
    pub struct StepBuilder => Step {
        into { label: String = "test step" }
        set {
            id: StepId = StepId::new(),
            phase_id: PhaseId = PhaseId::new(),
            job_id: JobId = JobId::new(),
            status: Status = Status::PendingAllocation,
            data: StepData = StepData::default(),
        }
        option {
            cluster: String = None,
            node: String = None,
            last_heartbeat_ms: u64 = None,
            replacement_id: StepId = None,
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
