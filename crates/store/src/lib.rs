// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cv-store: Unit-of-work storage for phases, steps, and their commands.
//!
//! All entity mutation goes through one lock: a closure passed to
//! [`Store::with_state_mut`] runs as a single atomic commit unit, so two
//! callers racing to allocate the same (job, label) converge on one record.

pub mod state;
pub mod store;
pub mod sync;

#[cfg(any(test, feature = "test-support"))]
pub use sync::RecordingScheduler;
pub use state::StoreState;
pub use store::Store;
pub use sync::{ChannelScheduler, SyncScheduler};
