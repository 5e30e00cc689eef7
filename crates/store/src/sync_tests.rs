// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn enqueue_delivers_to_worker() {
    let (scheduler, mut rx) = ChannelScheduler::new();
    let step_id = StepId::new();

    scheduler.enqueue(step_id);

    assert_eq!(rx.try_recv().ok(), Some(step_id));
}

#[test]
fn enqueue_if_needed_skips_pending_steps() {
    let (scheduler, mut rx) = ChannelScheduler::new();
    let step_id = StepId::new();

    scheduler.enqueue_if_needed(step_id);
    scheduler.enqueue_if_needed(step_id);

    assert_eq!(rx.try_recv().ok(), Some(step_id));
    assert!(rx.try_recv().is_err());
}

#[test]
fn acknowledge_rearms_enqueue_if_needed() {
    let (scheduler, mut rx) = ChannelScheduler::new();
    let step_id = StepId::new();

    scheduler.enqueue_if_needed(step_id);
    scheduler.acknowledge(step_id);
    scheduler.enqueue_if_needed(step_id);

    assert_eq!(rx.try_recv().ok(), Some(step_id));
    assert_eq!(rx.try_recv().ok(), Some(step_id));
}

#[test]
fn enqueue_survives_a_dropped_worker() {
    let (scheduler, rx) = ChannelScheduler::new();
    drop(rx);

    // Fire-and-forget: no panic, no error surfaced.
    scheduler.enqueue(StepId::new());
}

#[test]
fn distinct_steps_are_scheduled_independently() {
    let (scheduler, mut rx) = ChannelScheduler::new();
    let a = StepId::new();
    let b = StepId::new();

    scheduler.enqueue_if_needed(a);
    scheduler.enqueue_if_needed(b);

    assert_eq!(rx.try_recv().ok(), Some(a));
    assert_eq!(rx.try_recv().ok(), Some(b));
}

#[test]
fn recording_scheduler_tracks_order_and_dedup() {
    let scheduler = RecordingScheduler::new();
    let a = StepId::new();
    let b = StepId::new();

    scheduler.enqueue(a);
    scheduler.enqueue_if_needed(a);
    scheduler.enqueue_if_needed(b);

    assert_eq!(scheduler.enqueued(), vec![a, b]);
}
