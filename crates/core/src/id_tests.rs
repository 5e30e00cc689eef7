// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ids_are_unique() {
    let a = StepId::new();
    let b = StepId::new();
    assert_ne!(a, b);
}

#[test]
fn id_display_is_simple_hex() {
    let id = JobId::new();
    let s = id.to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn id_short_is_prefix() {
    let id = PhaseId::new();
    let short = id.short();
    assert_eq!(short.len(), 8);
    assert!(id.to_string().starts_with(&short));
}

#[test]
fn id_parse_round_trip() {
    let id = StepId::new();
    let parsed: StepId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn id_serde_is_transparent() {
    let id = CommandId::new();
    let json = serde_json::to_string(&id).unwrap();
    let parsed: CommandId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
    assert!(json.starts_with('"'));
}
