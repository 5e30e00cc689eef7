// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan configuration errors.

use thiserror::Error;

/// Errors raised while parsing or validating a build plan.
///
/// All of these surface at construction time; none are deferred to
/// allocation.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid plan TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("build plan declares no commands")]
    MissingCommands,

    #[error("command {index} has an empty script")]
    EmptyScript { index: usize },

    #[error("other_repos[{index}] must specify a repo")]
    OtherRepoMissingRepo { index: usize },

    #[error("other_repos[{index}] must specify a path")]
    OtherRepoMissingPath { index: usize },

    #[error("repo {repo} is not a full URL but no base URL is configured")]
    BareRepoWithoutBase { repo: String },
}
