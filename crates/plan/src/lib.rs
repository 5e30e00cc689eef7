// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cv-plan: Build-plan configuration parsing and validation.
//!
//! A build plan declares the user-visible half of a step: the commands to
//! run, the resources to request, auxiliary repositories to check out, and
//! debug switches. Plans are TOML documents validated eagerly — a broken
//! plan fails at parse/construction time, never at allocation time.

pub mod config;
pub mod debug;
pub mod error;

pub use config::{CommandConfig, OtherRepoConfig, PlanConfig};
pub use debug::DebugConfig;
pub use error::PlanError;
