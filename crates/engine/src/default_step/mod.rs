// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The standard build step: commands planned server-side, executed by a
//! remotely allocated agent.
//!
//! Jobs get allocated via the external scheduling framework's polling;
//! once allocated, a step is expected to begin reporting within the
//! configured heartbeat deadline. This module owns construction and
//! command planning; allocation, expansion, and parameter building live in
//! the sibling submodules.

mod allocate;
mod expand;
mod params;

pub use expand::StepBlueprint;

use crate::buildstep::{ArtifactHandler, BuildStep, ResourceLimits};
use crate::config::ServerConfig;
use crate::error::EngineError;
use crate::metrics::EngineMetrics;
use cv_core::{
    Clock, CommandTemplate, FailureRng, ImageId, Job, JobId, Step, VcsKind, VcsProvider,
};
use cv_plan::PlanConfig;
use cv_store::{Store, SyncScheduler};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Where the primary repository is checked out when the plan says nothing.
pub const DEFAULT_PATH: &str = "./source/";

/// Phase label forced when a plan declares any collector command.
///
/// Phase uniqueness is keyed by label, so an expanded phase picking this
/// exact name would collide with the collection phase.
pub const COLLECT_LABEL: &str = "Collect tests";

/// Binary that removes blacklisted paths listed in the project config.
const BLACKLIST_REMOVE_BIN: &str = "blacklist-remove";

const SERVICE_LOG_FILE_PATTERNS: [&str; 4] = [
    "logged.service",
    "*.logged.service",
    "service.log",
    "*.service.log",
];

fn default_env() -> IndexMap<String, String> {
    IndexMap::from([("CONVEYOR".to_string(), "1".to_string())])
}

fn default_artifacts() -> Vec<String> {
    let handlers = [
        ArtifactHandler::Xunit,
        ArtifactHandler::Coverage,
        ArtifactHandler::AnalyticsJson,
    ];
    handlers
        .iter()
        .flat_map(|h| h.filename_patterns().iter().copied())
        .chain(SERVICE_LOG_FILE_PATTERNS)
        .map(String::from)
        .collect()
}

/// Join `rel` under `base`; an absolute `rel` wins outright.
fn join_path(base: &str, rel: &str) -> String {
    Path::new(base).join(rel).to_string_lossy().into_owned()
}

/// The standard build-step implementation.
///
/// Holds the validated plan, the server configuration, and the resolved
/// per-plan defaults (paths, env, artifact globs, prepared command
/// templates). The snapshot-image cache is per-instance state: constructed
/// with the step, discarded with it, never shared across instances.
pub struct DefaultBuildStep<C: Clock, R: FailureRng> {
    plan: PlanConfig,
    pub(crate) server: ServerConfig,
    store: Arc<Store>,
    scheduler: Arc<dyn SyncScheduler>,
    pub(crate) metrics: Arc<EngineMetrics>,
    pub(crate) clock: C,
    rng: R,
    repo_path: String,
    path: String,
    artifact_search_path: String,
    env: IndexMap<String, String>,
    artifacts: Vec<String>,
    /// User-declared commands with defaults applied, in declared order
    commands: Vec<CommandTemplate>,
    /// Clone commands for auxiliary repositories, in declared order
    other_repo_commands: Vec<CommandTemplate>,
    image_cache: Mutex<HashMap<JobId, Option<ImageId>>>,
}

impl<C: Clock, R: FailureRng> DefaultBuildStep<C, R> {
    /// Build a step kind from a validated plan.
    ///
    /// All configuration errors (missing commands, malformed auxiliary-repo
    /// entries, unresolvable bare repo names) surface here, never at
    /// allocation time.
    pub fn new(
        plan: PlanConfig,
        server: ServerConfig,
        vcs: &dyn VcsProvider,
        store: Arc<Store>,
        scheduler: Arc<dyn SyncScheduler>,
        clock: C,
        rng: R,
    ) -> Result<Self, EngineError> {
        plan.validate()?;

        let (repo_path, path) = match (&plan.repo_path, &plan.path) {
            (Some(repo_path), Some(path)) => (repo_path.clone(), join_path(repo_path, path)),
            (Some(repo_path), None) => (repo_path.clone(), repo_path.clone()),
            (None, path) => {
                let path = path.clone().unwrap_or_else(|| DEFAULT_PATH.to_string());
                (path.clone(), path)
            }
        };
        let artifact_search_path = plan
            .artifact_search_path
            .clone()
            .unwrap_or_else(|| path.clone());
        let env = plan.env.clone().unwrap_or_else(default_env);
        let artifacts = plan.artifacts.clone().unwrap_or_else(default_artifacts);

        let mut this = Self {
            server,
            store,
            scheduler,
            metrics: Arc::new(EngineMetrics::new()),
            clock,
            rng,
            repo_path,
            path,
            artifact_search_path,
            env,
            artifacts,
            commands: Vec::new(),
            other_repo_commands: Vec::new(),
            image_cache: Mutex::new(HashMap::new()),
            plan,
        };

        let commands: Vec<CommandTemplate> = this
            .plan
            .commands
            .iter()
            .map(|config| {
                let mut template = CommandTemplate {
                    kind: config.kind,
                    script: config.script.clone(),
                    path: config.path.clone(),
                    env: config.env.clone().unwrap_or_default(),
                    artifacts: config.artifacts.clone().unwrap_or_default(),
                };
                this.apply_command_defaults(&mut template);
                template
            })
            .collect();
        this.commands = commands;
        let other_repo_commands = this.other_repo_clone_commands(vcs)?;
        this.other_repo_commands = other_repo_commands;

        Ok(this)
    }

    /// Parse the plan's auxiliary-repo entries into clone templates.
    fn other_repo_clone_commands(
        &self,
        vcs: &dyn VcsProvider,
    ) -> Result<Vec<CommandTemplate>, EngineError> {
        let mut commands = Vec::with_capacity(self.plan.other_repos.len());
        for repo in &self.plan.other_repos {
            let base_url = match repo.backend {
                VcsKind::Git => self.server.git_base_url.as_deref(),
                VcsKind::Hg => self.server.hg_base_url.as_deref(),
            };
            let remote_url = repo.remote_url(base_url)?;
            let backend = vcs.vcs_for(repo.backend);
            let script = backend.clone_command(
                &remote_url,
                &repo.path,
                repo.revision(),
                self.plan.clean,
                self.plan.debug.repo_cache_dir.as_deref(),
            );
            commands.push(CommandTemplate::infra(script).with_env(self.env.clone()));
        }
        Ok(commands)
    }

    /// The full, ordered command-template list for a job: primary checkout,
    /// patch, auxiliary checkouts, blacklist removal, then the declared
    /// commands. A repository without VCS capability contributes no
    /// checkout commands.
    pub fn plan_commands(&self, job: &Job) -> Vec<CommandTemplate> {
        let mut templates = Vec::new();

        if let Some(vcs) = job.source.repository.vcs() {
            templates.push(
                CommandTemplate::infra(vcs.checkout_command(
                    &job.source.revision,
                    &self.repo_path,
                    self.plan.clean,
                    self.plan.debug.repo_cache_dir.as_deref(),
                ))
                .with_env(self.env.clone()),
            );

            if job.source.patch.is_some() {
                templates.push(
                    CommandTemplate::infra(vcs.patch_command(&self.repo_path))
                        .with_env(self.env.clone()),
                );
            }

            templates.extend(self.other_repo_commands.iter().cloned());
        }

        templates.push(
            CommandTemplate::infra(format!(
                "{} \"{}\"",
                BLACKLIST_REMOVE_BIN,
                job.project.config_path()
            ))
            .with_path(self.repo_path.clone())
            .with_env(self.env.clone()),
        );

        templates.extend(self.commands.iter().cloned());
        templates
    }

    /// Fill a command template's unset path/env/artifacts from the plan's
    /// defaults. The command's own env entries win over the base env.
    fn apply_command_defaults(&self, template: &mut CommandTemplate) {
        if template.artifacts.is_empty() {
            template.artifacts = self.artifacts.clone();
        }
        template.path = Some(match template.path.as_deref() {
            Some(path) => join_path(&self.path, path),
            None => self.path.clone(),
        });
        let mut env = self.env.clone();
        env.extend(template.env.clone());
        template.env = env;
    }

    pub fn client_adapter(&self) -> &'static str {
        "basic"
    }

    /// Declared resource requirements for the external allocator.
    pub fn resource_limits(&self) -> ResourceLimits {
        ResourceLimits {
            cpus: self.plan.cpus,
            memory: self.plan.memory,
        }
    }

    /// Whether synchronization should prefer the artifact store when
    /// multiple artifact sources are available.
    pub fn prefer_artifactstore(&self) -> bool {
        self.plan.debug.prefer_artifactstore
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }
}

impl<C: Clock, R: FailureRng> BuildStep for DefaultBuildStep<C, R> {
    fn label(&self) -> String {
        "Build via Conveyor client".to_string()
    }

    fn plan_commands(&self, job: &Job) -> Vec<CommandTemplate> {
        DefaultBuildStep::plan_commands(self, job)
    }

    fn allocate(&self, job: &mut Job) -> Result<Step, EngineError> {
        DefaultBuildStep::allocate(self, job)
    }

    fn update_step(&self, step: &mut Step) {
        DefaultBuildStep::update_step(self, step)
    }

    fn cancel_step(&self, step: &mut Step) {
        DefaultBuildStep::cancel_step(self, step)
    }

    fn allocation_params(&self, step: &Step) -> IndexMap<String, String> {
        DefaultBuildStep::allocation_params(self, step)
    }

    fn artifact_handlers(&self) -> Vec<ArtifactHandler> {
        vec![
            ArtifactHandler::Coverage,
            ArtifactHandler::BazelTarget,
            ArtifactHandler::Xunit,
            ArtifactHandler::AnalyticsJson,
        ]
    }
}
