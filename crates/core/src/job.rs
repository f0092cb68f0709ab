// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job data model: a job's identity moves through three disjoint
//! collections (pending queue, active set, finished store) and is never in
//! more than one at an observation point.

use crate::id::JobId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where a job currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Finished,
}

crate::simple_display! {
    JobState {
        Pending => "pending",
        Running => "running",
        Finished => "finished",
    }
}

/// A pending job request, owned by its project's queue until promoted.
///
/// Duplicate (project, job_id) pairs are permitted: resubmitting the same
/// job id yields multiple independent entries. Cancellation removes one
/// pending instance per call but signals every matching running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub project: String,
    pub spider: String,
    pub job_id: JobId,
    /// Lower values are polled first; ties break by submission order.
    pub priority: i64,
    /// Artifact version to run against; `None` means latest.
    pub version: Option<String>,
    /// Extra environment settings passed through to the spawned process.
    pub settings: BTreeMap<String, String>,
    /// Extra arguments appended to the runner invocation.
    pub args: Vec<String>,
}

impl JobSpec {
    /// Create a spec with a generated job id and default priority.
    pub fn new(project: impl Into<String>, spider: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            spider: spider.into(),
            job_id: JobId::generate(),
            priority: 0,
            version: None,
            settings: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    crate::setters! {
        into {
            job_id: JobId,
        }
        set {
            priority: i64,
            settings: BTreeMap<String, String>,
            args: Vec<String>,
        }
        option {
            version: String,
        }
    }
}

crate::builder! {
    pub struct JobSpecBuilder => JobSpec {
        into {
            project: String = "p1",
            spider: String = "s1",
            job_id: JobId = "j1",
        }
        set {
            priority: i64 = 0,
            settings: BTreeMap<String, String> = BTreeMap::new(),
            args: Vec<String> = Vec::new(),
        }
        option {
            version: String = None,
        }
    }
}

/// A job realized as a live OS process, owned exclusively by the launcher.
#[derive(Debug, Clone)]
pub struct RunningJob {
    pub spec: JobSpec,
    /// Epoch milliseconds at spawn time.
    pub start_ms: u64,
    pub pid: u32,
    pub log_path: PathBuf,
    pub items_path: PathBuf,
}

/// A terminated job. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedJob {
    pub project: String,
    pub spider: String,
    pub job_id: JobId,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Recorded but not interpreted: a crash is an ordinary termination.
    pub exit_code: Option<i32>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
