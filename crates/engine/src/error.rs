// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine errors.

use cv_core::{JobId, PhaseId, StepId};
use thiserror::Error;

/// Errors that can occur during allocation, expansion, or recovery.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The validity filter left nothing to run: a broken build plan.
    /// Allocation aborts rather than producing an unschedulable step.
    #[error("no commands materialized for job {job_id} after filtering")]
    NoCommands { job_id: JobId },

    /// A step marked expanded has no persisted commands to rebuild from.
    #[error("step {0} is marked expanded but has no persisted commands")]
    ExpandedStepWithoutCommands(StepId),

    #[error("phase {0} not found")]
    PhaseNotFound(PhaseId),

    #[error("step {0} not found")]
    StepNotFound(StepId),

    #[error(transparent)]
    Plan(#[from] cv_plan::PlanError),
}
