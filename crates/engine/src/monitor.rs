// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat monitoring: reclaiming allocated steps whose agent went quiet.

use crate::buildstep::BuildStep;
use crate::default_step::DefaultBuildStep;
use cv_core::{Clock, FailureRng, Status, Step};
use cv_store::Store;
use std::sync::Arc;

impl<C: Clock, R: FailureRng> DefaultBuildStep<C, R> {
    /// Reclaim an allocated step whose last heartbeat is older than the
    /// configured timeout: reset it to pending allocation and count the
    /// timeout. Pure and idempotent; never raises, never inspects
    /// command-level state.
    pub fn update_step(&self, step: &mut Step) {
        if step.status != Status::Allocated {
            return;
        }
        let Some(last_heartbeat_ms) = step.last_heartbeat_ms else {
            return;
        };
        let timeout_ms = self.server.allocation_timeout_secs * 1000;
        let elapsed_ms = self.clock.epoch_ms().saturating_sub(last_heartbeat_ms);
        if elapsed_ms >= timeout_ms {
            step.status = Status::PendingAllocation;
            self.metrics.incr_allocation_timeout();
            tracing::warn!(
                step_id = %step.id,
                elapsed_ms,
                "allocation timed out; step returned to pending"
            );
        }
    }

    /// Cancellation is acknowledged but needs no server-side work; the
    /// external agent pool tears the execution down.
    pub fn cancel_step(&self, _step: &mut Step) {}
}

/// Sweeps allocated steps on its owner's cadence, applying the build
/// step's per-step maintenance to each.
pub struct HeartbeatMonitor {
    store: Arc<Store>,
    buildstep: Arc<dyn BuildStep>,
}

impl HeartbeatMonitor {
    pub fn new(store: Arc<Store>, buildstep: Arc<dyn BuildStep>) -> Self {
        Self { store, buildstep }
    }

    /// One monitoring pass over every allocated step.
    ///
    /// Returns the number of steps reclaimed to pending allocation.
    pub fn run_pass(&self) -> usize {
        let ids = self
            .store
            .with_state(|state| state.step_ids_with_status(Status::Allocated));

        let mut reclaimed = 0;
        for id in ids {
            let demoted = self.store.with_state_mut(|state| {
                let Some(step) = state.step_mut(id) else {
                    return false;
                };
                self.buildstep.update_step(step);
                step.status == Status::PendingAllocation
            });
            if demoted {
                reclaimed += 1;
            }
        }
        if reclaimed > 0 {
            tracing::info!(reclaimed, "heartbeat pass reclaimed stalled steps");
        }
        reclaimed
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
