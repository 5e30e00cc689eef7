// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cv_core::test_support::{job_with_vcs, FakeVcsProvider};
use cv_core::{Cause, FakeClock, FakeRng};
use cv_store::{RecordingScheduler, Store};
use indexmap::IndexMap;
use std::sync::Arc;

const COLLECTOR_PLAN: &str = r#"
cluster = "bazel"

[[commands]]
script = "make deps"
type = "setup"

[[commands]]
script = "collect-tests"
type = "collect"

[[commands]]
script = "make test"

[[commands]]
script = "make clean"
type = "teardown"
"#;

struct Fixture {
    step_kind: DefaultBuildStep<FakeClock, FakeRng>,
    store: Arc<Store>,
}

fn fixture_with(plan_toml: &str, rng: FakeRng) -> Fixture {
    let plan = cv_plan::PlanConfig::from_toml_str(plan_toml).unwrap();
    let store = Arc::new(Store::new());
    let step_kind = DefaultBuildStep::new(
        plan,
        crate::ServerConfig::default(),
        &FakeVcsProvider,
        store.clone(),
        Arc::new(RecordingScheduler::new()),
        FakeClock::new(),
        rng,
    )
    .unwrap();
    Fixture { step_kind, store }
}

fn fixture() -> Fixture {
    fixture_with(COLLECTOR_PLAN, FakeRng::default())
}

/// Allocate the parent and expand one child blueprint in a single commit.
fn expand(
    f: &Fixture,
    job: &mut Job,
    blueprint: StepBlueprint,
    skip_setup_teardown: bool,
) -> Result<Step, EngineError> {
    let parent = f.step_kind.allocate(job).unwrap();
    f.store.with_state_mut(|state| {
        f.step_kind.expand_step(
            state,
            job,
            parent.id,
            parent.phase_id,
            blueprint,
            skip_setup_teardown,
        )
    })
}

fn shard_blueprint() -> StepBlueprint {
    StepBlueprint::new(
        "shard 1",
        vec![
            CommandTemplate::new(CommandType::Command, "run-shard 1/2"),
            CommandTemplate::new(CommandType::Command, "run-shard 2/2"),
        ],
    )
}

#[test]
fn expansion_wraps_child_commands_with_setup_and_teardown() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let child = expand(&f, &mut job, shard_blueprint(), false).unwrap();

    let commands: Vec<(CommandType, String, u32)> = f.store.with_state(|state| {
        state
            .commands(child.id)
            .iter()
            .map(|c| (c.kind, c.script.clone(), c.order))
            .collect()
    });

    // setup-class: checkout + blacklist + "make deps"; then the two child
    // commands; then teardown
    assert_eq!(commands.len(), 6);
    assert!(commands[..3].iter().all(|(k, _, _)| k.is_setup()));
    assert_eq!(commands[3].1, "run-shard 1/2");
    assert_eq!(commands[4].1, "run-shard 2/2");
    assert_eq!(commands[5].0, CommandType::Teardown);

    let orders: Vec<u32> = commands.iter().map(|(_, _, o)| *o).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn expansion_applies_command_defaults_to_child_commands() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let child = expand(&f, &mut job, shard_blueprint(), false).unwrap();

    let (path, env) = f.store.with_state(|state| {
        let command = &state.commands(child.id)[3];
        (command.path.clone(), command.env.clone())
    });
    assert_eq!(path.as_deref(), Some("./source/"));
    assert_eq!(env.get("CONVEYOR").map(String::as_str), Some("1"));
}

#[test]
fn skip_setup_teardown_uses_declared_commands_verbatim() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let child = expand(&f, &mut job, shard_blueprint(), true).unwrap();

    let commands: Vec<(String, Option<String>)> = f.store.with_state(|state| {
        state
            .commands(child.id)
            .iter()
            .map(|c| (c.script.clone(), c.path.clone()))
            .collect()
    });
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].0, "run-shard 1/2");
    // Verbatim means no defaulting either
    assert_eq!(commands[0].1, None);
}

#[test]
fn child_inherits_whitelisted_fields_it_left_unset() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);
    let parent = f.step_kind.allocate(&mut job).unwrap();
    f.store.with_state_mut(|state| {
        let step = state.step_mut(parent.id).unwrap();
        step.data.cpus = Some(4);
        step.data.tests = Some(vec!["a".to_string()]);
    });

    let blueprint = shard_blueprint().with_data(StepData {
        cpus: Some(2),
        ..StepData::default()
    });
    let child = f
        .store
        .with_state_mut(|state| {
            f.step_kind
                .expand_step(state, &job, parent.id, parent.phase_id, blueprint, false)
        })
        .unwrap();

    assert_eq!(child.data.cpus, Some(2));
    assert_eq!(child.data.tests, Some(vec!["a".to_string()]));
}

#[test]
fn child_is_marked_expanded_with_cluster_affinity() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let child = expand(&f, &mut job, shard_blueprint(), false).unwrap();

    assert!(child.data.expanded);
    assert_eq!(child.cluster.as_deref(), Some("bazel"));
    assert_eq!(child.status, Status::PendingAllocation);
}

#[test]
fn chaos_uses_the_expanded_phase_tag() {
    let plan = format!("{}\n[debug.infra_failures]\nexpanded = 0.5\n", COLLECTOR_PLAN);
    let f = fixture_with(&plan, FakeRng::new([0.1]));
    let mut job = job_with_vcs(Cause::Push);

    // Primary allocation must not consume the draw: only "expanded" is
    // configured.
    let child = expand(&f, &mut job, shard_blueprint(), false).unwrap();

    assert!(child.data.force_infra_failure);
    assert_eq!(f.step_kind.metrics().injected_failures(), 1);
}

#[test]
fn expansion_records_declared_targets_and_dependencies() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let mut dependency_map = IndexMap::new();
    dependency_map.insert("//pkg:a".to_string(), vec!["f1.py".to_string()]);
    dependency_map.insert("//pkg:stale".to_string(), vec!["f2.py".to_string()]);
    let blueprint = shard_blueprint().with_data(StepData {
        targets: Some(vec!["//pkg:a".to_string(), "//pkg:b".to_string()]),
        dependency_map: Some(dependency_map),
        ..StepData::default()
    });

    let child = expand(&f, &mut job, blueprint, false).unwrap();

    f.store.with_state(|state| {
        let targets = state.targets_for_step(child.id);
        assert_eq!(targets.len(), 2);
        let a = targets.iter().find(|t| t.name == "//pkg:a").unwrap();
        let b = targets.iter().find(|t| t.name == "//pkg:b").unwrap();
        assert_eq!(state.messages_for_target(a.id).len(), 1);
        assert!(state.messages_for_target(b.id).is_empty());
        assert!(!targets.iter().any(|t| t.name == "//pkg:stale"));
    });
}

#[test]
fn empty_blueprint_with_skip_is_a_fatal_plan_error() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);

    let err = expand(&f, &mut job, StepBlueprint::new("shard 0", vec![]), true).unwrap_err();

    assert!(matches!(err, EngineError::NoCommands { .. }));
}

#[test]
fn aborted_expansion_leaves_no_step_behind() {
    let f = fixture();
    let mut job = job_with_vcs(Cause::Push);
    let parent = f.step_kind.allocate(&mut job).unwrap();

    let result = f.store.with_state_mut(|state| {
        f.step_kind.expand_step(
            state,
            &job,
            parent.id,
            parent.phase_id,
            StepBlueprint::new("shard 0", vec![]),
            true,
        )
    });
    assert!(result.is_err());

    let allocated = f
        .store
        .with_state(|state| state.step_ids_with_status(Status::PendingAllocation));
    assert_eq!(allocated, vec![parent.id]);
}
