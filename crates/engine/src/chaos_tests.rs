// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cv_core::{FakeRng, Step};

fn debug_with(phase: &str, probability: f64) -> DebugConfig {
    let mut debug = DebugConfig::default();
    debug.infra_failures.insert(phase.to_string(), probability);
    debug
}

#[test]
fn draw_below_probability_marks_the_step() {
    let mut step = Step::builder().build();
    let metrics = EngineMetrics::new();
    let rng = FakeRng::new([0.3]);

    let marked = apply(&mut step, &debug_with("primary", 0.5), PRIMARY_PHASE, &rng, &metrics);

    assert!(marked);
    assert!(step.data.force_infra_failure);
    assert_eq!(metrics.injected_failures(), 1);
}

#[test]
fn draw_at_or_above_probability_leaves_the_step_alone() {
    let mut step = Step::builder().build();
    let metrics = EngineMetrics::new();
    let rng = FakeRng::new([0.5]);

    let marked = apply(&mut step, &debug_with("primary", 0.5), PRIMARY_PHASE, &rng, &metrics);

    assert!(!marked);
    assert!(!step.data.force_infra_failure);
    assert_eq!(metrics.injected_failures(), 0);
}

#[test]
fn absent_phase_tag_means_no_draw() {
    let mut step = Step::builder().build();
    let metrics = EngineMetrics::new();
    // Scripted draw would mark the step if consumed; an unconfigured
    // phase must not consume it.
    let rng = FakeRng::new([0.0]);

    let marked = apply(&mut step, &DebugConfig::default(), EXPANDED_PHASE, &rng, &metrics);

    assert!(!marked);
    assert_eq!(rng.next_f64(), 0.0);
}

#[test]
fn phases_are_independent() {
    let debug = debug_with("expanded", 1.0);
    let metrics = EngineMetrics::new();
    let rng = FakeRng::new([0.99]);

    let mut step = Step::builder().build();
    assert!(!apply(&mut step, &debug, PRIMARY_PHASE, &rng, &metrics));
    assert!(apply(&mut step, &debug, EXPANDED_PHASE, &rng, &metrics));
}
