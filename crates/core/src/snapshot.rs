// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot images captured by snapshot-cause jobs.

use crate::id::{ImageId, JobId};
use serde::{Deserialize, Serialize};

/// A captured, reusable execution environment. At most one per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotImage {
    pub id: ImageId,
    pub job_id: JobId,
}

impl SnapshotImage {
    pub fn new(job_id: JobId) -> Self {
        Self {
            id: ImageId::new(),
            job_id,
        }
    }
}
