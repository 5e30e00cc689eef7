// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation and replacement: turning a job into a schedulable step.

use super::{DefaultBuildStep, COLLECT_LABEL};
use crate::chaos;
use crate::error::EngineError;
use cv_core::{
    Clock, CommandTemplate, CommandType, FailureRng, Job, PhaseId, Status, Step, StepData, StepId,
};
use cv_store::StoreState;

impl<C: Clock, R: FailureRng> DefaultBuildStep<C, R> {
    /// Create (or idempotently fetch) the job's phase and step, materialize
    /// the filtered command list, and hand the step to the sync worker.
    ///
    /// The phase label is the job's natural label unless the plan declares
    /// a collector command, in which case the fixed collection label is
    /// forced regardless of the job.
    pub fn allocate(&self, job: &mut Job) -> Result<Step, EngineError> {
        job.status = Status::PendingAllocation;

        let label = if self.plan.has_collector() {
            COLLECT_LABEL
        } else {
            job.label.as_str()
        };

        let step = self.store.with_state_mut(|state| {
            let phase_id = state.get_or_create_phase(job.id, label, Status::PendingAllocation);
            self.setup_step(state, phase_id, job, None)
        })?;

        tracing::info!(
            job_id = %job.id,
            step_id = %step.id,
            phase = label,
            "allocated step"
        );
        self.scheduler.enqueue(step.id);
        Ok(step)
    }

    /// Create a successor for a failed step, continuing its lineage.
    ///
    /// A never-expanded step is simply re-allocated from scratch — the full
    /// pipeline is regenerated. An expanded step's pipeline only exists in
    /// its persisted commands, so those are rebuilt into templates and
    /// re-expanded verbatim (setup/teardown are already embedded).
    pub fn replace_step(&self, job: &Job, failed_id: StepId) -> Result<Step, EngineError> {
        let failed = self
            .store
            .with_state(|state| state.step(failed_id).cloned())
            .ok_or(EngineError::StepNotFound(failed_id))?;

        let step = if !failed.data.expanded {
            self.store.with_state_mut(|state| {
                self.setup_step(state, failed.phase_id, job, Some(failed_id))
            })?
        } else {
            let templates: Vec<CommandTemplate> = self.store.with_state(|state| {
                state
                    .commands(failed_id)
                    .iter()
                    .map(CommandTemplate::from_command)
                    .collect()
            });
            if templates.is_empty() {
                return Err(EngineError::ExpandedStepWithoutCommands(failed_id));
            }
            let blueprint = super::StepBlueprint {
                label: failed.label.clone(),
                commands: templates,
                data: StepData::default(),
            };

            self.store.with_state_mut(|state| {
                let new_step =
                    self.expand_step(state, job, failed_id, failed.phase_id, blueprint, true)?;
                Self::link_replacement(state, failed_id, new_step.id);
                Ok::<_, EngineError>(state.step(new_step.id).cloned().unwrap_or(new_step))
            })?
        };

        tracing::info!(
            failed_step_id = %failed_id,
            step_id = %step.id,
            expanded = failed.data.expanded,
            "created replacement step"
        );
        self.scheduler.enqueue_if_needed(step.id);
        Ok(step)
    }

    /// Create (or fetch) the step for a phase and materialize its commands.
    ///
    /// With `replaces`, a fresh step id is forced so a second step is
    /// intentionally created on the same phase, and the failed step is
    /// linked to its successor.
    pub(super) fn setup_step(
        &self,
        state: &mut StoreState,
        phase_id: PhaseId,
        job: &Job,
        replaces: Option<StepId>,
    ) -> Result<Step, EngineError> {
        let label = state
            .phase(phase_id)
            .ok_or(EngineError::PhaseNotFound(phase_id))?
            .label
            .clone();

        // Filter before any step exists: a plan that filters down to
        // nothing must abort without leaving an unschedulable step behind.
        let all = self.plan_commands(job);
        let valid = Self::validity_predicate(job, &all);
        let filtered: Vec<CommandTemplate> =
            all.into_iter().filter(|t| valid(t.kind)).collect();
        if filtered.is_empty() {
            return Err(EngineError::NoCommands { job_id: job.id });
        }

        let (step_id, created) =
            state.get_or_create_step(phase_id, &label, replaces.is_some(), || Step {
                id: StepId::new(),
                phase_id,
                job_id: job.id,
                label: label.clone(),
                status: Status::PendingAllocation,
                cluster: self.plan.cluster.clone(),
                node: None,
                last_heartbeat_ms: None,
                replacement_id: None,
                data: StepData {
                    release: Some(self.plan.release.clone()),
                    max_executors: Some(self.plan.max_executors),
                    cpus: Some(self.plan.cpus),
                    memory: Some(self.plan.memory),
                    ..StepData::default()
                },
            });
        if created {
            tracing::debug!(step_id = %step_id, phase_id = %phase_id, "created step");
        }

        if let Some(step) = state.step_mut(step_id) {
            chaos::apply(
                step,
                &self.plan.debug,
                chaos::PRIMARY_PHASE,
                &self.rng,
                &self.metrics,
            );
        }

        let commands = filtered
            .into_iter()
            .enumerate()
            .map(|(order, template)| template.into_command(step_id, order as u32))
            .collect();
        state.set_commands(step_id, commands);

        if let Some(failed_id) = replaces {
            Self::link_replacement(state, failed_id, step_id);
        }

        state
            .step(step_id)
            .cloned()
            .ok_or(EngineError::StepNotFound(step_id))
    }

    /// Select the command-validity predicate for a job: snapshot builds
    /// filter by the snapshot rule; a planned collector switches the run to
    /// collection filtering; everything else keeps the full default set.
    fn validity_predicate(job: &Job, templates: &[CommandTemplate]) -> fn(CommandType) -> bool {
        if job.build.cause.is_snapshot() {
            CommandType::is_valid_for_snapshot
        } else if templates.iter().any(|t| t.kind.is_collector()) {
            CommandType::is_valid_for_collection
        } else {
            CommandType::is_valid_for_default
        }
    }

    /// Point the failed step at its successor and record the failed node
    /// for best-effort anti-affinity.
    fn link_replacement(state: &mut StoreState, failed_id: StepId, new_id: StepId) {
        let failed_node = state.step(failed_id).and_then(|s| s.node.clone());
        if let Some(failed) = state.step_mut(failed_id) {
            failed.replacement_id = Some(new_id);
        }
        if let Some(node) = failed_node {
            if let Some(new_step) = state.step_mut(new_id) {
                new_step.data.avoid_node = Some(node);
            }
        }
    }
}

#[cfg(test)]
#[path = "allocate_tests.rs"]
mod tests;
