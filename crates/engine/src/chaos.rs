// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chaos injection: deterministically-random forced infrastructure failures.
//!
//! Exists purely to exercise the recovery engine; a chaos-marked step fails
//! the same way an organically infra-failed step does and is recovered by
//! the same path.

use crate::metrics::EngineMetrics;
use cv_core::{FailureRng, Step};
use cv_plan::DebugConfig;

/// Phase tag for steps created by primary allocation.
pub const PRIMARY_PHASE: &str = "primary";
/// Phase tag for steps created by runtime expansion.
pub const EXPANDED_PHASE: &str = "expanded";

/// Draw once against the configured probability for `phase` and, on a hit,
/// mark the step for a forced infrastructure failure.
///
/// A phase tag absent from the debug config means probability zero and no
/// draw is consumed. Returns whether the step was marked.
pub fn apply(
    step: &mut Step,
    debug: &DebugConfig,
    phase: &str,
    rng: &impl FailureRng,
    metrics: &EngineMetrics,
) -> bool {
    let probability = debug.failure_probability(phase);
    if probability <= 0.0 {
        return false;
    }
    if rng.next_f64() >= probability {
        return false;
    }
    step.data.force_infra_failure = true;
    metrics.incr_injected_failure();
    tracing::info!(
        step_id = %step.id,
        phase,
        probability,
        "chaos: forcing infrastructure failure"
    );
    true
}

#[cfg(test)]
#[path = "chaos_tests.rs"]
mod tests;
