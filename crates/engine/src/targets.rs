// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target and dependency recording for expanded steps.

use cv_core::{BazelTarget, BazelTargetMessage, Step, TargetId};
use cv_store::StoreState;
use std::collections::HashMap;

/// Create one target record per name declared in the step's data, then
/// attach a dependency annotation for every map entry whose target is
/// declared and whose file list is non-empty.
///
/// Dependency data may reference targets the step no longer declares;
/// those entries are skipped. Messages follow the map's declared order,
/// but consumers must not rely on any ordering among them.
pub fn record_targets(state: &mut StoreState, step: &Step) {
    let Some(names) = step.data.targets.as_ref() else {
        return;
    };

    let mut by_name: HashMap<&str, TargetId> = HashMap::with_capacity(names.len());
    for name in names {
        let target = BazelTarget::declared(step.id, step.job_id, name.clone());
        by_name.insert(name.as_str(), target.id);
        state.add_target(target);
    }

    let Some(dependency_map) = step.data.dependency_map.as_ref() else {
        return;
    };
    for (target_name, files) in dependency_map {
        if files.is_empty() {
            continue;
        }
        let Some(&target_id) = by_name.get(target_name.as_str()) else {
            continue;
        };
        let mut lines = vec!["This target was affected by the following files:".to_string()];
        lines.extend(files.iter().map(|f| format!("    {}", f)));
        state.add_target_message(BazelTargetMessage {
            target_id,
            text: lines.join("\n"),
        });
    }
}

#[cfg(test)]
#[path = "targets_tests.rs"]
mod tests;
