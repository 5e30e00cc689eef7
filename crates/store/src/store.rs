// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-lock access to the orchestration state.

use crate::state::StoreState;
use parking_lot::Mutex;

/// Owns the [`StoreState`] behind one mutex.
///
/// Each closure passed to [`with_state_mut`] runs under the lock as one
/// atomic commit unit; the engines scope their transaction boundaries by
/// choosing what to batch into a single closure.
///
/// [`with_state_mut`]: Store::with_state_mut
#[derive(Debug, Default)]
pub struct Store {
    state: Mutex<StoreState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access under the lock.
    pub fn with_state<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        f(&self.state.lock())
    }

    /// Mutating access under the lock; one call = one commit unit.
    pub fn with_state_mut<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        f(&mut self.state.lock())
    }
}
