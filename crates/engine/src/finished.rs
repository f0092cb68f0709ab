// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retention of terminated jobs.
//!
//! The most recent N finished jobs stay in memory; older entries are
//! delegated to the durable [`JobHistory`]. Listing merges both sources so
//! eviction is invisible to readers.

use crate::error::EngineError;
use spool_core::FinishedJob;
use spool_store::JobHistory;
use std::collections::VecDeque;
use std::sync::Arc;

pub struct FinishedJobStore {
    recent: VecDeque<FinishedJob>,
    keep: usize,
    history: Arc<dyn JobHistory>,
}

impl FinishedJobStore {
    pub fn new(keep: usize, history: Arc<dyn JobHistory>) -> Self {
        Self { recent: VecDeque::new(), keep, history }
    }

    /// Record a terminated job, evicting the oldest in-memory entry to the
    /// durable history when the window overflows.
    pub fn add(&mut self, job: FinishedJob) -> Result<(), EngineError> {
        self.recent.push_back(job);
        while self.recent.len() > self.keep {
            if let Some(evicted) = self.recent.pop_front() {
                tracing::debug!(
                    project = %evicted.project,
                    job_id = %evicted.job_id,
                    "finished job evicted to durable history"
                );
                self.history.record(&evicted)?;
            }
        }
        Ok(())
    }

    /// Most-recent-first view bounded to `limit` in-memory entries.
    pub fn recent(&self, limit: usize) -> Vec<FinishedJob> {
        self.recent.iter().rev().take(limit).cloned().collect()
    }

    /// All finished jobs, most-recent-first: the in-memory window first,
    /// then durable entries.
    pub fn list(&self, project: Option<&str>) -> Result<Vec<FinishedJob>, EngineError> {
        let mut jobs: Vec<FinishedJob> = self
            .recent
            .iter()
            .rev()
            .filter(|j| project.map_or(true, |p| j.project == p))
            .cloned()
            .collect();
        jobs.extend(self.history.list(project)?);
        Ok(jobs)
    }

    /// Whether any finished job matches (project filter, job_id).
    pub fn contains(&self, project: Option<&str>, job_id: &str) -> Result<bool, EngineError> {
        Ok(self.list(project)?.iter().any(|j| j.job_id == job_id))
    }

    pub fn in_memory_len(&self) -> usize {
        self.recent.len()
    }
}

#[cfg(test)]
#[path = "finished_tests.rs"]
mod tests;
