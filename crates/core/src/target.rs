// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-target build/test result records.

use crate::id::{JobId, StepId, TargetId};
use crate::status::{BuildResult, ResultSource, Status};
use serde::{Deserialize, Serialize};

/// A named unit of build/test result, owned by exactly one step and job.
///
/// Carries its own status/result independent of the owning step's
/// aggregate result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BazelTarget {
    pub id: TargetId,
    pub step_id: StepId,
    pub job_id: JobId,
    pub name: String,
    pub status: Status,
    pub result: BuildResult,
    pub result_source: ResultSource,
}

impl BazelTarget {
    /// A freshly declared target: in progress, result not yet known.
    pub fn declared(step_id: StepId, job_id: JobId, name: impl Into<String>) -> Self {
        Self {
            id: TargetId::new(),
            step_id,
            job_id,
            name: name.into(),
            status: Status::InProgress,
            result: BuildResult::Unknown,
            result_source: ResultSource::FromSelf,
        }
    }
}

/// Free-text annotation attached to exactly one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BazelTargetMessage {
    pub target_id: TargetId,
    pub text: String,
}
