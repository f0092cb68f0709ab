// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project pending-job queues.
//!
//! A queue owns its pending [`JobSpec`]s until the poller promotes them.
//! `pop` yields the lowest priority value first, ties broken by submission
//! order; `list` preserves submission order for stable external views.
//! Empty is a normal condition, not an error.

use spool_core::{JobId, JobSpec};
use std::collections::BTreeMap;

/// Ordered collection of pending job requests for one project.
#[derive(Debug, Default)]
pub struct JobQueue {
    // (submission sequence, spec); seq breaks priority ties oldest-first
    items: Vec<(u64, JobSpec)>,
    next_seq: u64,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a job, returning its id.
    pub fn add(&mut self, spec: JobSpec) -> JobId {
        let id = spec.job_id.clone();
        self.items.push((self.next_seq, spec));
        self.next_seq += 1;
        id
    }

    /// Remove and return the next job: lowest priority value, oldest first.
    pub fn pop(&mut self) -> Option<JobSpec> {
        let idx = self
            .items
            .iter()
            .enumerate()
            .min_by_key(|(_, (seq, spec))| (spec.priority, *seq))
            .map(|(idx, _)| idx)?;
        Some(self.items.remove(idx).1)
    }

    /// Pending jobs in submission order.
    pub fn list(&self) -> impl Iterator<Item = &JobSpec> {
        self.items.iter().map(|(_, spec)| spec)
    }

    /// Remove every pending instance matching `job_id`; returns the count.
    pub fn remove(&mut self, job_id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|(_, spec)| spec.job_id != job_id);
        before - self.items.len()
    }

    /// Remove exactly one pending instance matching `job_id` (the oldest).
    /// Duplicate ids may coexist; cancellation takes one per call.
    pub fn remove_one(&mut self, job_id: &str) -> bool {
        match self.items.iter().position(|(_, spec)| spec.job_id == job_id) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All per-project queues, keyed by project name.
///
/// Per-project instances are independent; cross-project ordering is the
/// poller's concern.
#[derive(Debug, Default)]
pub struct QueueSet {
    queues: BTreeMap<String, JobQueue>,
}

impl QueueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue into the project's queue, creating it on first use.
    pub fn add(&mut self, spec: JobSpec) -> JobId {
        self.queues.entry(spec.project.clone()).or_default().add(spec)
    }

    pub fn get(&self, project: &str) -> Option<&JobQueue> {
        self.queues.get(project)
    }

    pub fn get_mut(&mut self, project: &str) -> Option<&mut JobQueue> {
        self.queues.get_mut(project)
    }

    /// Drop a project's queue entirely (project deleted).
    pub fn remove_project(&mut self, project: &str) -> usize {
        self.queues.remove(project).map_or(0, |q| q.len())
    }

    /// Project names with at least one pending job, sorted.
    pub fn projects_with_pending(&self) -> Vec<String> {
        self.queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Iterate (project, queue) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobQueue)> {
        self.queues.iter().map(|(name, q)| (name.as_str(), q))
    }

    pub fn total_pending(&self) -> usize {
        self.queues.values().map(JobQueue::len).sum()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
