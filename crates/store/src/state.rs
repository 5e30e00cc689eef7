// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity maps and the create-or-fetch primitives over them.

use cv_core::{
    BazelTarget, BazelTargetMessage, Command, ImageId, JobId, Phase, PhaseId, SnapshotImage,
    Status, Step, StepId, TargetId,
};
use std::collections::HashMap;

/// All orchestration entities, plus the uniqueness indexes backing the
/// create-or-fetch primitives.
///
/// Entities are created at allocation time and mutated by the recovery and
/// expansion engines; nothing here is ever physically deleted — completion
/// and archival are an external concern.
#[derive(Debug, Default)]
pub struct StoreState {
    phases: HashMap<PhaseId, Phase>,
    phase_index: HashMap<(JobId, String), PhaseId>,
    steps: HashMap<StepId, Step>,
    step_index: HashMap<(PhaseId, String), StepId>,
    commands: HashMap<StepId, Vec<Command>>,
    targets: HashMap<TargetId, BazelTarget>,
    target_messages: Vec<BazelTargetMessage>,
    snapshot_images: HashMap<JobId, SnapshotImage>,
}

impl StoreState {
    // ── Phases ──────────────────────────────────────────────────────────

    /// Fetch the phase for (job, label), creating it when absent.
    ///
    /// Re-invoking allocation for the same label never creates a duplicate.
    pub fn get_or_create_phase(&mut self, job_id: JobId, label: &str, status: Status) -> PhaseId {
        let key = (job_id, label.to_string());
        if let Some(&id) = self.phase_index.get(&key) {
            return id;
        }
        let phase = Phase {
            id: PhaseId::new(),
            job_id,
            label: label.to_string(),
            status,
        };
        let id = phase.id;
        self.phase_index.insert(key, id);
        self.phases.insert(id, phase);
        id
    }

    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.get(&id)
    }

    // ── Steps ───────────────────────────────────────────────────────────

    /// Fetch the step for (phase, label), creating it from `make` when
    /// absent.
    ///
    /// With `force_new`, the (phase, label) index is bypassed and left
    /// untouched: a replacement intentionally creates a second step on the
    /// same phase under a fresh id. Returns the step id and whether a new
    /// step was created.
    pub fn get_or_create_step<F>(
        &mut self,
        phase_id: PhaseId,
        label: &str,
        force_new: bool,
        make: F,
    ) -> (StepId, bool)
    where
        F: FnOnce() -> Step,
    {
        let key = (phase_id, label.to_string());
        if !force_new {
            if let Some(&id) = self.step_index.get(&key) {
                return (id, false);
            }
        }
        let step = make();
        let id = step.id;
        self.steps.insert(id, step);
        if !force_new {
            self.step_index.insert(key, id);
        }
        (id, true)
    }

    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.get(&id)
    }

    pub fn step_mut(&mut self, id: StepId) -> Option<&mut Step> {
        self.steps.get_mut(&id)
    }

    pub fn insert_step(&mut self, step: Step) -> StepId {
        let id = step.id;
        self.steps.insert(id, step);
        id
    }

    /// Ids of all steps currently in the given status.
    pub fn step_ids_with_status(&self, status: Status) -> Vec<StepId> {
        self.steps
            .values()
            .filter(|s| s.status == status)
            .map(|s| s.id)
            .collect()
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Replace the step's materialized command list wholesale.
    pub fn set_commands(&mut self, step_id: StepId, commands: Vec<Command>) {
        self.commands.insert(step_id, commands);
    }

    pub fn commands(&self, step_id: StepId) -> &[Command] {
        self.commands.get(&step_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Targets ─────────────────────────────────────────────────────────

    pub fn add_target(&mut self, target: BazelTarget) -> TargetId {
        let id = target.id;
        self.targets.insert(id, target);
        id
    }

    pub fn target(&self, id: TargetId) -> Option<&BazelTarget> {
        self.targets.get(&id)
    }

    pub fn targets_for_step(&self, step_id: StepId) -> Vec<&BazelTarget> {
        self.targets
            .values()
            .filter(|t| t.step_id == step_id)
            .collect()
    }

    pub fn add_target_message(&mut self, message: BazelTargetMessage) {
        self.target_messages.push(message);
    }

    pub fn messages_for_target(&self, target_id: TargetId) -> Vec<&BazelTargetMessage> {
        self.target_messages
            .iter()
            .filter(|m| m.target_id == target_id)
            .collect()
    }

    // ── Snapshot images ─────────────────────────────────────────────────

    /// Register the snapshot image a job is capturing. At most one per job;
    /// registering again replaces the record.
    pub fn put_snapshot_image(&mut self, image: SnapshotImage) {
        self.snapshot_images.insert(image.job_id, image);
    }

    pub fn remove_snapshot_image(&mut self, job_id: JobId) {
        self.snapshot_images.remove(&job_id);
    }

    pub fn snapshot_image_for_job(&self, job_id: JobId) -> Option<ImageId> {
        self.snapshot_images.get(&job_id).map(|image| image.id)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
