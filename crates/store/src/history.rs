// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable finished-job history.
//!
//! The engine keeps only the most recent N finished jobs in memory; older
//! records are delegated here. The JSON-lines implementation is append-only
//! and replayed on read — job volume is low enough that a scan is fine.

use parking_lot::Mutex;
use spool_core::FinishedJob;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("job history i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("job history record malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable store for finished jobs evicted from the in-memory window.
pub trait JobHistory: Send + Sync {
    fn record(&self, job: &FinishedJob) -> Result<(), HistoryError>;

    /// Point lookup by identity. Most-recent record wins when duplicates
    /// share an identity.
    fn lookup(
        &self,
        project: &str,
        spider: &str,
        job_id: &str,
    ) -> Result<Option<FinishedJob>, HistoryError>;

    /// Records most-recent-first, optionally filtered by project.
    fn list(&self, project: Option<&str>) -> Result<Vec<FinishedJob>, HistoryError>;
}

/// Append-only JSON-lines file history.
pub struct JsonlHistory {
    path: PathBuf,
    // Serializes appends from the eviction path
    write_lock: Mutex<()>,
}

impl JsonlHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    fn read_all(&self) -> Result<Vec<FinishedJob>, HistoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut jobs = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            jobs.push(serde_json::from_str(&line)?);
        }
        Ok(jobs)
    }
}

impl JobHistory for JsonlHistory {
    fn record(&self, job: &FinishedJob) -> Result<(), HistoryError> {
        let line = serde_json::to_string(job)?;
        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn lookup(
        &self,
        project: &str,
        spider: &str,
        job_id: &str,
    ) -> Result<Option<FinishedJob>, HistoryError> {
        Ok(self.read_all()?.into_iter().rev().find(|j| {
            j.project == project && j.spider == spider && j.job_id == job_id
        }))
    }

    fn list(&self, project: Option<&str>) -> Result<Vec<FinishedJob>, HistoryError> {
        let mut jobs = self.read_all()?;
        if let Some(project) = project {
            jobs.retain(|j| j.project == project);
        }
        jobs.reverse();
        Ok(jobs)
    }
}

/// In-memory history for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryHistory {
    jobs: Mutex<Vec<FinishedJob>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }
}

impl JobHistory for MemoryHistory {
    fn record(&self, job: &FinishedJob) -> Result<(), HistoryError> {
        self.jobs.lock().push(job.clone());
        Ok(())
    }

    fn lookup(
        &self,
        project: &str,
        spider: &str,
        job_id: &str,
    ) -> Result<Option<FinishedJob>, HistoryError> {
        Ok(self
            .jobs
            .lock()
            .iter()
            .rev()
            .find(|j| j.project == project && j.spider == spider && j.job_id == job_id)
            .cloned())
    }

    fn list(&self, project: Option<&str>) -> Result<Vec<FinishedJob>, HistoryError> {
        let jobs = self.jobs.lock();
        Ok(jobs
            .iter()
            .rev()
            .filter(|j| project.map_or(true, |p| j.project == p))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
