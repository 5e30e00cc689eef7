// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cv_core::{BuildResult, Status, Step, StepData};
use indexmap::IndexMap;

fn step_with(targets: Option<Vec<&str>>, deps: &[(&str, &[&str])]) -> Step {
    let dependency_map = if deps.is_empty() {
        None
    } else {
        Some(
            deps.iter()
                .map(|(t, fs)| (t.to_string(), fs.iter().map(|f| f.to_string()).collect()))
                .collect::<IndexMap<String, Vec<String>>>(),
        )
    };
    Step::builder()
        .data(StepData {
            targets: targets.map(|ts| ts.into_iter().map(String::from).collect()),
            dependency_map,
            ..StepData::default()
        })
        .build()
}

#[test]
fn declares_one_record_per_target() {
    let mut state = StoreState::default();
    let step = step_with(Some(vec!["//a", "//b"]), &[]);

    record_targets(&mut state, &step);

    let targets = state.targets_for_step(step.id);
    assert_eq!(targets.len(), 2);
    for target in targets {
        assert_eq!(target.status, Status::InProgress);
        assert_eq!(target.result, BuildResult::Unknown);
        assert_eq!(target.job_id, step.job_id);
    }
}

#[test]
fn no_declared_targets_records_nothing() {
    let mut state = StoreState::default();
    let step = step_with(None, &[("//a", &["f1.py"])]);

    record_targets(&mut state, &step);

    assert!(state.targets_for_step(step.id).is_empty());
}

#[test]
fn dependency_messages_only_for_declared_targets() {
    let mut state = StoreState::default();
    let step = step_with(
        Some(vec!["//a", "//b"]),
        &[("//a", &["f1.py"]), ("//c", &["f2.py"])],
    );

    record_targets(&mut state, &step);

    let targets = state.targets_for_step(step.id);
    assert_eq!(targets.len(), 2);
    let a = targets.iter().find(|t| t.name == "//a").unwrap();
    let b = targets.iter().find(|t| t.name == "//b").unwrap();

    let messages = state.messages_for_target(a.id);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.contains("f1.py"));
    assert!(state.messages_for_target(b.id).is_empty());
    assert!(!targets.iter().any(|t| t.name == "//c"));
}

#[test]
fn empty_file_lists_produce_no_message() {
    let mut state = StoreState::default();
    let step = step_with(Some(vec!["//a"]), &[("//a", &[])]);

    record_targets(&mut state, &step);

    let targets = state.targets_for_step(step.id);
    assert!(state.messages_for_target(targets[0].id).is_empty());
}

#[test]
fn message_lists_each_affecting_file() {
    let mut state = StoreState::default();
    let step = step_with(Some(vec!["//a"]), &[("//a", &["f1.py", "f2.py"])]);

    record_targets(&mut state, &step);

    let targets = state.targets_for_step(step.id);
    let messages = state.messages_for_target(targets[0].id);
    let text = &messages[0].text;
    assert!(text.starts_with("This target was affected by the following files:"));
    assert!(text.contains("    f1.py"));
    assert!(text.contains("    f2.py"));
}
