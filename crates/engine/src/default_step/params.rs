// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allocation parameters: the flag set handed to the execution agent.

use super::DefaultBuildStep;
use cv_core::{Clock, FailureRng, ImageId, JobId, Step};
use indexmap::IndexMap;

impl<C: Clock, R: FailureRng> DefaultBuildStep<C, R> {
    /// The snapshot image a job is expected to capture, if any.
    ///
    /// Memoized per instance so repeated calls for the same job id hit the
    /// store at most once over this instance's lifetime.
    pub fn image_for_job(&self, job_id: JobId) -> Option<ImageId> {
        *self
            .image_cache
            .lock()
            .entry(job_id)
            .or_insert_with(|| {
                self.store
                    .with_state(|state| state.snapshot_image_for_job(job_id))
            })
    }

    /// Derive the flag set handed to the execution agent for a step.
    ///
    /// Deterministic given the step and the static configuration; keys with
    /// absent or empty values are omitted.
    pub fn allocation_params(&self, step: &Step) -> IndexMap<String, String> {
        let mut params = IndexMap::new();
        let insert = |params: &mut IndexMap<String, String>, key: &str, value: String| {
            params.insert(key.to_string(), value);
        };

        let artifact_search_path = step
            .data
            .artifact_search_path
            .clone()
            .unwrap_or_else(|| self.artifact_search_path.clone());
        insert(&mut params, "artifact-search-path", artifact_search_path);
        insert(
            &mut params,
            "artifacts-server",
            self.server.artifacts_server.clone(),
        );
        insert(&mut params, "adapter", self.client_adapter().to_string());
        insert(&mut params, "server", self.server.internal_uri("/api/0/"));
        insert(&mut params, "jobstep_id", step.id.to_string());
        insert(&mut params, "s3-bucket", self.server.snapshot_bucket.clone());
        insert(
            &mut params,
            "pre-launch",
            self.plan
                .debug
                .prelaunch_script
                .clone()
                .unwrap_or_else(|| self.server.pre_launch.clone()),
        );
        insert(
            &mut params,
            "post-launch",
            self.plan
                .debug
                .postlaunch_script
                .clone()
                .unwrap_or_else(|| self.server.post_launch.clone()),
        );
        insert(&mut params, "release", self.plan.release.clone());
        insert(&mut params, "use-external-env", "false".to_string());
        insert(
            &mut params,
            "use-path-in-artifact-name",
            self.plan.use_path_in_artifact_name.to_string(),
        );
        insert(
            &mut params,
            "artifact-suffix",
            self.plan.artifact_suffix.clone(),
        );

        if let Some(dsn) = &self.server.client_sentry_dsn {
            insert(&mut params, "sentry-dsn", dsn.clone());
        }
        if let Some(mounts) = &self.plan.debug.bind_mounts {
            insert(&mut params, "bind-mounts", mounts.clone());
        }
        if let Some(image) = self.image_for_job(step.job_id) {
            insert(&mut params, "save-snapshot", image.to_string());
        }
        if let Some(dist) = &self.server.dist_template {
            insert(&mut params, "dist", dist.clone());
        }

        params.retain(|_, value| !value.is_empty());
        params
    }

    /// Full agent invocation for a step: the client binary plus its flags.
    pub fn allocation_command(&self, step: &Step) -> String {
        let params = self.allocation_params(step);
        let flags: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("-{}={}", key, value))
            .collect();
        format!("{} {}", self.server.client_binary, flags.join(" "))
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
