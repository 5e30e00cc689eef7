// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Version-control collaborator interface.
//!
//! Conveyor never runs VCS operations itself; it only asks a backend for
//! shell-executable command strings to hand to the execution agent.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Supported version-control backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
    Hg,
}

impl VcsKind {
    /// Revision checked out when an auxiliary-repo entry declares none.
    pub fn default_revision(self) -> &'static str {
        match self {
            VcsKind::Git => "origin/master",
            VcsKind::Hg => "default",
        }
    }
}

crate::simple_display! {
    VcsKind {
        Git => "git",
        Hg => "hg",
    }
}

/// Generates shell-executable command strings for one backend.
pub trait Vcs: Send + Sync {
    fn kind(&self) -> VcsKind;

    /// Command that checks out the primary repository at `revision` into
    /// `repo_path`, optionally cleaning first and preferring a pre-warmed
    /// local cache when `cache_dir` is set.
    fn checkout_command(
        &self,
        revision: &str,
        repo_path: &str,
        clean: bool,
        cache_dir: Option<&str>,
    ) -> String;

    /// Command that applies the source's patch inside `repo_path`.
    fn patch_command(&self, repo_path: &str) -> String;

    /// Command that clones an auxiliary repository.
    fn clone_command(
        &self,
        remote_url: &str,
        path: &str,
        revision: &str,
        clean: bool,
        cache_dir: Option<&str>,
    ) -> String;
}

/// Resolves a backend kind to a live [`Vcs`] collaborator.
pub trait VcsProvider: Send + Sync {
    fn vcs_for(&self, kind: VcsKind) -> Arc<dyn Vcs>;
}

#[cfg(test)]
#[path = "vcs_tests.rs"]
mod tests;
