// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine counters surfaced to the service's stats reporter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters the engine increments as it recovers and injects failures.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    allocation_timeouts: AtomicU64,
    injected_failures: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr_allocation_timeout(&self) {
        self.allocation_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn allocation_timeouts(&self) -> u64 {
        self.allocation_timeouts.load(Ordering::Relaxed)
    }

    pub fn incr_injected_failure(&self) {
        self.injected_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn injected_failures(&self) -> u64 {
        self.injected_failures.load(Ordering::Relaxed)
    }
}
