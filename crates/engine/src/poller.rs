// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Next-job selection across projects.
//!
//! The poller decides *what runs next*; whether it may run now is the
//! launcher's concern. Projects take turns round-robin; within a project
//! the queue's own priority order applies.

use crate::queue::QueueSet;
use spool_core::JobSpec;

/// Round-robin poller over all projects with pending work.
#[derive(Debug, Default)]
pub struct Poller {
    cursor: usize,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next pending job, or `None` when no project has work.
    pub fn poll(&mut self, queues: &mut QueueSet) -> Option<JobSpec> {
        let candidates = queues.projects_with_pending();
        if candidates.is_empty() {
            return None;
        }
        let project = &candidates[self.cursor % candidates.len()];
        self.cursor = self.cursor.wrapping_add(1);
        queues.get_mut(project)?.pop()
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
