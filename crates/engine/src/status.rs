// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side aggregation over the three job collections.
//!
//! A job id is classified into exactly one state per observation, with
//! fixed precedence pending, then running, then finished. Everything here
//! is a pure projection; no state is mutated.

use crate::error::EngineError;
use crate::finished::FinishedJobStore;
use crate::queue::QueueSet;
use serde::Serialize;
use spool_core::{JobId, JobState, RunningJob};

/// A queued job, not yet realized as a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEntry {
    pub id: JobId,
    pub project: String,
    pub spider: String,
}

/// A live job process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunningEntry {
    pub id: JobId,
    pub project: String,
    pub spider: String,
    pub start_ms: u64,
    pub pid: u32,
}

/// A terminated job, with retrieval URLs for its log and item feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedEntry {
    pub id: JobId,
    pub project: String,
    pub spider: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub log_url: String,
    pub items_url: String,
}

/// The three disjoint per-state views, each in its own order: pending by
/// submission, running by spawn, finished most-recent-first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobListing {
    pub pending: Vec<PendingEntry>,
    pub running: Vec<RunningEntry>,
    pub finished: Vec<FinishedEntry>,
}

/// Aggregate counts for liveness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaemonStatus {
    pub pending: usize,
    pub running: usize,
    pub finished: usize,
}

/// Borrowed view over the collections a status question reads.
pub struct StatusView<'a> {
    queues: &'a QueueSet,
    active: &'a [RunningJob],
    finished: &'a FinishedJobStore,
}

impl<'a> StatusView<'a> {
    pub fn new(
        queues: &'a QueueSet,
        active: &'a [RunningJob],
        finished: &'a FinishedJobStore,
    ) -> Self {
        Self { queues, active, finished }
    }

    /// Classify a job id: pending wins over running wins over finished;
    /// `None` when the id is absent everywhere.
    pub fn job_state(
        &self,
        project: Option<&str>,
        job_id: &str,
    ) -> Result<Option<JobState>, EngineError> {
        let in_project = |p: &str| project.map_or(true, |want| p == want);

        let pending = self
            .queues
            .iter()
            .filter(|(name, _)| in_project(name))
            .any(|(_, q)| q.list().any(|spec| spec.job_id == job_id));
        if pending {
            return Ok(Some(JobState::Pending));
        }

        let running = self
            .active
            .iter()
            .any(|job| in_project(&job.spec.project) && job.spec.job_id == job_id);
        if running {
            return Ok(Some(JobState::Running));
        }

        if self.finished.contains(project, job_id)? {
            return Ok(Some(JobState::Finished));
        }
        Ok(None)
    }

    /// All jobs, projected per state, optionally restricted to one project.
    pub fn list_jobs(&self, project: Option<&str>) -> Result<JobListing, EngineError> {
        let in_project = |p: &str| project.map_or(true, |want| p == want);

        let pending = self
            .queues
            .iter()
            .filter(|(name, _)| in_project(name))
            .flat_map(|(_, q)| q.list())
            .map(|spec| PendingEntry {
                id: spec.job_id.clone(),
                project: spec.project.clone(),
                spider: spec.spider.clone(),
            })
            .collect();

        let running = self
            .active
            .iter()
            .filter(|job| in_project(&job.spec.project))
            .map(|job| RunningEntry {
                id: job.spec.job_id.clone(),
                project: job.spec.project.clone(),
                spider: job.spec.spider.clone(),
                start_ms: job.start_ms,
                pid: job.pid,
            })
            .collect();

        let finished = self
            .finished
            .list(project)?
            .into_iter()
            .map(|job| FinishedEntry {
                log_url: format!("/logs/{}/{}/{}.log", job.project, job.spider, job.job_id),
                items_url: format!("/items/{}/{}/{}.jl", job.project, job.spider, job.job_id),
                id: job.job_id,
                project: job.project,
                spider: job.spider,
                start_ms: job.start_ms,
                end_ms: job.end_ms,
            })
            .collect();

        Ok(JobListing { pending, running, finished })
    }

    /// Counts only. The finished count covers the in-memory retention
    /// window, not the full durable history.
    pub fn daemon_status(&self) -> DaemonStatus {
        DaemonStatus {
            pending: self.queues.total_pending(),
            running: self.active.len(),
            finished: self.finished.in_memory_len(),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
