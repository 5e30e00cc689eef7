// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobs: one build attempt for a source revision.

use crate::id::{BuildId, JobId};
use crate::status::Status;
use crate::vcs::Vcs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Why a build was started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    #[default]
    Unknown,
    Manual,
    Push,
    Retry,
    /// Capturing a reusable execution-environment snapshot
    Snapshot,
}

impl Cause {
    pub fn is_snapshot(self) -> bool {
        matches!(self, Cause::Snapshot)
    }
}

crate::simple_display! {
    Cause {
        Unknown => "unknown",
        Manual => "manual",
        Push => "push",
        Retry => "retry",
        Snapshot => "snapshot",
    }
}

/// A build groups the jobs spawned for one triggering cause.
#[derive(Debug, Clone)]
pub struct Build {
    pub id: BuildId,
    pub cause: Cause,
}

impl Build {
    pub fn new(cause: Cause) -> Self {
        Self {
            id: BuildId::new(),
            cause,
        }
    }
}

/// Project the job builds, carrying its build-configuration location.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    /// Overrides the conventional config location when set
    pub config: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    /// Path of the project's build configuration within the repository.
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or("project.conf")
    }
}

/// A source repository and its (optional) VCS collaborator.
///
/// A repository with no VCS handle yields no checkout commands; the build
/// is expected to fetch sources some other way.
#[derive(Clone)]
pub struct Repository {
    pub url: String,
    vcs: Option<Arc<dyn Vcs>>,
}

impl Repository {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            vcs: None,
        }
    }

    pub fn with_vcs(url: impl Into<String>, vcs: Arc<dyn Vcs>) -> Self {
        Self {
            url: url.into(),
            vcs: Some(vcs),
        }
    }

    pub fn vcs(&self) -> Option<&Arc<dyn Vcs>> {
        self.vcs.as_ref()
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("url", &self.url)
            .field("vcs", &self.vcs.as_ref().map(|v| v.kind()))
            .finish()
    }
}

/// A patch queued for application on top of the checked-out revision.
#[derive(Debug, Clone)]
pub struct Patch {
    pub diff: String,
}

/// Repository + revision + optional patch: what a job builds.
#[derive(Debug, Clone)]
pub struct Source {
    pub repository: Repository,
    pub revision: String,
    pub patch: Option<Patch>,
}

impl Source {
    pub fn new(repository: Repository, revision: impl Into<String>) -> Self {
        Self {
            repository,
            revision: revision.into(),
            patch: None,
        }
    }

    pub fn with_patch(mut self, diff: impl Into<String>) -> Self {
        self.patch = Some(Patch { diff: diff.into() });
        self
    }
}

/// One build attempt for a given source revision.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub build: Build,
    pub project: Project,
    /// Natural label; the phase label unless a collection run overrides it
    pub label: String,
    pub source: Source,
    pub status: Status,
}

impl Job {
    pub fn new(build: Build, project: Project, label: impl Into<String>, source: Source) -> Self {
        Self {
            id: JobId::new(),
            build,
            project,
            label: label.into(),
            source,
            status: Status::PendingAllocation,
        }
    }
}
