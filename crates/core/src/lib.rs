// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cv-core: Entity model for the Conveyor orchestration core

pub mod macros;

pub mod clock;
pub mod command;
pub mod id;
pub mod job;
pub mod rng;
pub mod snapshot;
pub mod status;
pub mod step;
pub mod target;
pub mod vcs;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{Command, CommandTemplate, CommandType};
pub use id::{BuildId, CommandId, ImageId, JobId, PhaseId, StepId, TargetId};
pub use job::{Build, Cause, Job, Patch, Project, Repository, Source};
pub use rng::{FailureRng, FakeRng, ThreadRng};
pub use snapshot::SnapshotImage;
pub use status::{BuildResult, ResultSource, Status};
#[cfg(any(test, feature = "test-support"))]
pub use step::StepBuilder;
pub use step::{Phase, Step, StepData};
pub use target::{BazelTarget, BazelTargetMessage};
pub use vcs::{Vcs, VcsKind, VcsProvider};
