// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget handoff to the external step-synchronization worker.

use cv_core::StepId;
use parking_lot::Mutex;
use std::collections::HashSet;
use tokio::sync::mpsc;

/// Enqueue-and-return notification that a step needs synchronization.
///
/// The core never blocks on, retries, or observes the outcome; at-least-once
/// delivery is the downstream worker's concern. The only correctness
/// requirement here is that [`enqueue_if_needed`] never double-schedules a
/// step that is already pending.
///
/// [`enqueue_if_needed`]: SyncScheduler::enqueue_if_needed
pub trait SyncScheduler: Send + Sync {
    /// Schedule a sync pass for the step.
    fn enqueue(&self, step_id: StepId);

    /// Schedule a sync pass unless one is already pending for the step.
    fn enqueue_if_needed(&self, step_id: StepId);
}

/// Channel-backed scheduler handing step ids to a worker task.
pub struct ChannelScheduler {
    tx: mpsc::UnboundedSender<StepId>,
    pending: Mutex<HashSet<StepId>>,
}

impl ChannelScheduler {
    /// Returns the scheduler and the receiving end for the worker task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StepId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: Mutex::new(HashSet::new()),
            },
            rx,
        )
    }

    /// Mark a step's pending sync as taken by the worker, re-arming
    /// [`SyncScheduler::enqueue_if_needed`] for it.
    pub fn acknowledge(&self, step_id: StepId) {
        self.pending.lock().remove(&step_id);
    }

    fn send(&self, step_id: StepId) {
        // Fire-and-forget: a dropped receiver only means nobody is syncing.
        if self.tx.send(step_id).is_err() {
            tracing::debug!(step_id = %step_id, "sync worker gone; notification dropped");
        }
    }
}

impl SyncScheduler for ChannelScheduler {
    fn enqueue(&self, step_id: StepId) {
        self.pending.lock().insert(step_id);
        self.send(step_id);
    }

    fn enqueue_if_needed(&self, step_id: StepId) {
        if !self.pending.lock().insert(step_id) {
            return;
        }
        self.send(step_id);
    }
}

/// Test scheduler recording every notification in order.
#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
pub struct RecordingScheduler {
    enqueued: Mutex<Vec<StepId>>,
    pending: Mutex<HashSet<StepId>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueued(&self) -> Vec<StepId> {
        self.enqueued.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl SyncScheduler for RecordingScheduler {
    fn enqueue(&self, step_id: StepId) {
        self.pending.lock().insert(step_id);
        self.enqueued.lock().push(step_id);
    }

    fn enqueue_if_needed(&self, step_id: StepId) {
        if !self.pending.lock().insert(step_id) {
            return;
        }
        self.enqueued.lock().push(step_id);
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
