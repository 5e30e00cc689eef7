// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::job::{Build, Cause, Job, Project, Repository, Source};
use crate::vcs::{Vcs, VcsKind, VcsProvider};
use std::sync::Arc;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::command::CommandType;
    use crate::status::Status;
    use proptest::prelude::*;

    pub fn arb_command_type() -> impl Strategy<Value = CommandType> {
        prop_oneof![
            Just(CommandType::InfraSetup),
            Just(CommandType::Setup),
            Just(CommandType::Command),
            Just(CommandType::Collect),
            Just(CommandType::Teardown),
        ]
    }

    pub fn arb_status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::PendingAllocation),
            Just(Status::Allocated),
            Just(Status::InProgress),
            Just(Status::Finished),
        ]
    }
}

// ── Fake VCS collaborator ───────────────────────────────────────────────

/// A VCS backend that emits recognizable command strings instead of real
/// git/hg invocations.
pub struct FakeVcs {
    kind: VcsKind,
}

impl FakeVcs {
    pub fn new(kind: VcsKind) -> Self {
        Self { kind }
    }
}

impl Vcs for FakeVcs {
    fn kind(&self) -> VcsKind {
        self.kind
    }

    fn checkout_command(
        &self,
        revision: &str,
        repo_path: &str,
        clean: bool,
        cache_dir: Option<&str>,
    ) -> String {
        format!(
            "{} checkout {} into {} clean={} cache={}",
            self.kind,
            revision,
            repo_path,
            clean,
            cache_dir.unwrap_or("-"),
        )
    }

    fn patch_command(&self, repo_path: &str) -> String {
        format!("{} apply-patch in {}", self.kind, repo_path)
    }

    fn clone_command(
        &self,
        remote_url: &str,
        path: &str,
        revision: &str,
        clean: bool,
        cache_dir: Option<&str>,
    ) -> String {
        format!(
            "{} clone {} into {} at {} clean={} cache={}",
            self.kind,
            remote_url,
            path,
            revision,
            clean,
            cache_dir.unwrap_or("-"),
        )
    }
}

/// Provider handing out [`FakeVcs`] backends.
#[derive(Default)]
pub struct FakeVcsProvider;

impl VcsProvider for FakeVcsProvider {
    fn vcs_for(&self, kind: VcsKind) -> Arc<dyn Vcs> {
        Arc::new(FakeVcs::new(kind))
    }
}

// ── Entity factories ────────────────────────────────────────────────────

/// A job whose repository exposes a fake git backend.
pub fn job_with_vcs(cause: Cause) -> Job {
    let repo = Repository::with_vcs(
        "https://example.com/server.git",
        Arc::new(FakeVcs::new(VcsKind::Git)),
    );
    Job::new(
        Build::new(cause),
        Project::new("server"),
        "build server",
        Source::new(repo, "aabbccdd"),
    )
}

/// A job whose repository exposes no VCS capability.
pub fn job_without_vcs(cause: Cause) -> Job {
    Job::new(
        Build::new(cause),
        Project::new("server"),
        "build server",
        Source::new(Repository::new("https://example.com/server.git"), "aabbccdd"),
    )
}

/// A job with a patch queued on top of the revision.
pub fn job_with_patch(cause: Cause) -> Job {
    let mut job = job_with_vcs(cause);
    job.source = job.source.with_patch("--- a/x\n+++ b/x\n");
    job
}
