// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cv_core::{SnapshotImage, StepData};

fn make_step(phase_id: PhaseId, job_id: JobId, label: &str) -> Step {
    Step::builder()
        .phase_id(phase_id)
        .job_id(job_id)
        .label(label)
        .build()
}

#[test]
fn phase_get_or_create_is_idempotent() {
    let mut state = StoreState::default();
    let job_id = JobId::new();

    let first = state.get_or_create_phase(job_id, "build server", Status::PendingAllocation);
    let second = state.get_or_create_phase(job_id, "build server", Status::PendingAllocation);

    assert_eq!(first, second);
    assert_eq!(state.phase(first).unwrap().label, "build server");
}

#[test]
fn phases_are_distinct_per_job_and_label() {
    let mut state = StoreState::default();
    let job_a = JobId::new();
    let job_b = JobId::new();

    let a1 = state.get_or_create_phase(job_a, "build", Status::PendingAllocation);
    let a2 = state.get_or_create_phase(job_a, "collect", Status::PendingAllocation);
    let b1 = state.get_or_create_phase(job_b, "build", Status::PendingAllocation);

    assert_ne!(a1, a2);
    assert_ne!(a1, b1);
}

#[test]
fn step_get_or_create_is_idempotent_for_fresh_allocations() {
    let mut state = StoreState::default();
    let job_id = JobId::new();
    let phase_id = state.get_or_create_phase(job_id, "build", Status::PendingAllocation);

    let (first, created_first) =
        state.get_or_create_step(phase_id, "build", false, || make_step(phase_id, job_id, "build"));
    let (second, created_second) =
        state.get_or_create_step(phase_id, "build", false, || make_step(phase_id, job_id, "build"));

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first, second);
}

#[test]
fn force_new_creates_a_second_step_on_the_same_phase() {
    let mut state = StoreState::default();
    let job_id = JobId::new();
    let phase_id = state.get_or_create_phase(job_id, "build", Status::PendingAllocation);

    let (original, _) =
        state.get_or_create_step(phase_id, "build", false, || make_step(phase_id, job_id, "build"));
    let (replacement, created) =
        state.get_or_create_step(phase_id, "build", true, || make_step(phase_id, job_id, "build"));

    assert!(created);
    assert_ne!(original, replacement);

    // The index still resolves fresh lookups to the original step.
    let (lookup, created) =
        state.get_or_create_step(phase_id, "build", false, || make_step(phase_id, job_id, "build"));
    assert!(!created);
    assert_eq!(lookup, original);
}

#[test]
fn set_commands_replaces_wholesale() {
    let mut state = StoreState::default();
    let step_id = state.insert_step(Step::builder().build());

    let cmd = |script: &str, order| {
        cv_core::CommandTemplate::new(cv_core::CommandType::Command, script)
            .into_command(step_id, order)
    };
    state.set_commands(step_id, vec![cmd("a", 0), cmd("b", 1)]);
    assert_eq!(state.commands(step_id).len(), 2);

    state.set_commands(step_id, vec![cmd("c", 0)]);
    assert_eq!(state.commands(step_id).len(), 1);
    assert_eq!(state.commands(step_id)[0].script, "c");
}

#[test]
fn commands_empty_for_unknown_step() {
    let state = StoreState::default();
    assert!(state.commands(StepId::new()).is_empty());
}

#[test]
fn step_ids_with_status_filters() {
    let mut state = StoreState::default();
    let allocated = state.insert_step(
        Step::builder()
            .status(Status::Allocated)
            .data(StepData::default())
            .build(),
    );
    state.insert_step(Step::builder().status(Status::Finished).build());

    let ids = state.step_ids_with_status(Status::Allocated);
    assert_eq!(ids, vec![allocated]);
}

#[test]
fn snapshot_image_lookup_by_job() {
    let mut state = StoreState::default();
    let job_id = JobId::new();
    assert_eq!(state.snapshot_image_for_job(job_id), None);

    let image = SnapshotImage::new(job_id);
    let image_id = image.id;
    state.put_snapshot_image(image);

    assert_eq!(state.snapshot_image_for_job(job_id), Some(image_id));

    state.remove_snapshot_image(job_id);
    assert_eq!(state.snapshot_image_for_job(job_id), None);
}

#[test]
fn target_messages_attach_to_their_target() {
    let mut state = StoreState::default();
    let step = Step::builder().build();
    let target_id = state.add_target(cv_core::BazelTarget::declared(
        step.id,
        step.job_id,
        "//pkg:test",
    ));

    state.add_target_message(cv_core::BazelTargetMessage {
        target_id,
        text: "affected".to_string(),
    });

    assert_eq!(state.messages_for_target(target_id).len(), 1);
    assert_eq!(state.targets_for_step(step.id).len(), 1);
    assert_eq!(state.messages_for_target(cv_core::TargetId::new()).len(), 0);
}
