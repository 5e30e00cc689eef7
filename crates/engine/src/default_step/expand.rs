// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expansion: materializing runtime-discovered child steps.

use super::DefaultBuildStep;
use crate::chaos;
use crate::error::EngineError;
use crate::targets;
use cv_core::{
    Clock, Command, CommandTemplate, CommandType, FailureRng, Job, PhaseId, Status, Step,
    StepData, StepId,
};
use cv_store::StoreState;

/// A child step description produced at runtime (e.g. shards discovered by
/// a collector), not yet materialized.
#[derive(Debug, Clone)]
pub struct StepBlueprint {
    pub label: String,
    /// Commands declared by the child itself
    pub commands: Vec<CommandTemplate>,
    /// Attributes the child has set; unset fields inherit from the base step
    pub data: StepData,
}

impl StepBlueprint {
    pub fn new(label: impl Into<String>, commands: Vec<CommandTemplate>) -> Self {
        Self {
            label: label.into(),
            commands,
            data: StepData::default(),
        }
    }

    pub fn with_data(mut self, data: StepData) -> Self {
        self.data = data;
        self
    }
}

impl<C: Clock, R: FailureRng> DefaultBuildStep<C, R> {
    /// Convert a blueprint into a concrete step on `new_phase_id`.
    ///
    /// The child inherits the base step's whitelisted attributes (only
    /// where it has not set them itself) and the plan's cluster affinity,
    /// and is marked `expanded`. Unless `skip_setup_teardown`, the child's
    /// own commands are wrapped as setup-class templates → child commands
    /// (with plan defaults applied) → teardown templates; with it, the
    /// declared list is used verbatim — the caller guarantees setup and
    /// teardown are already embedded, as when re-materializing a
    /// previously-run step.
    ///
    /// Runs inside the caller's `with_state_mut` closure so that multiple
    /// expansions can batch into one commit unit.
    pub fn expand_step(
        &self,
        state: &mut StoreState,
        job: &Job,
        base_step_id: StepId,
        new_phase_id: PhaseId,
        blueprint: StepBlueprint,
        skip_setup_teardown: bool,
    ) -> Result<Step, EngineError> {
        let base = state
            .step(base_step_id)
            .cloned()
            .ok_or(EngineError::StepNotFound(base_step_id))?;
        let phase_job_id = state
            .phase(new_phase_id)
            .ok_or(EngineError::PhaseNotFound(new_phase_id))?
            .job_id;

        let StepBlueprint {
            label,
            commands: mut declared,
            mut data,
        } = blueprint;

        data.inherit_from(&base.data);
        data.expanded = true;

        let mut step = Step {
            id: StepId::new(),
            phase_id: new_phase_id,
            job_id: phase_job_id,
            label,
            status: Status::PendingAllocation,
            cluster: self.plan.cluster.clone(),
            node: None,
            last_heartbeat_ms: None,
            replacement_id: None,
            data,
        };
        chaos::apply(
            &mut step,
            &self.plan.debug,
            chaos::EXPANDED_PHASE,
            &self.rng,
            &self.metrics,
        );

        let mut setup = Vec::new();
        let mut teardown = Vec::new();
        if !skip_setup_teardown {
            for template in self.plan_commands(job) {
                if template.kind.is_setup() {
                    setup.push(template);
                } else if template.kind == CommandType::Teardown {
                    teardown.push(template);
                }
            }
            for template in &mut declared {
                self.apply_command_defaults(template);
            }
        }

        let step_id = step.id;
        let commands: Vec<Command> = setup
            .into_iter()
            .chain(declared)
            .chain(teardown)
            .enumerate()
            .map(|(order, template)| template.into_command(step_id, order as u32))
            .collect();
        if commands.is_empty() {
            return Err(EngineError::NoCommands { job_id: job.id });
        }

        state.insert_step(step.clone());
        state.set_commands(step_id, commands);
        targets::record_targets(state, &step);

        tracing::debug!(
            base_step_id = %base_step_id,
            step_id = %step_id,
            label = %step.label,
            "expanded step"
        );
        Ok(step)
    }
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
