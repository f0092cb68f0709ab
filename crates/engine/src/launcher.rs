// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process supervision under a concurrency cap.
//!
//! The launcher owns the active set exclusively. A tick promotes pending
//! jobs while capacity remains; the cap is a hard ceiling enforced only at
//! spawn time. Exit notifications arrive as events drained by the same
//! scheduling loop that ticks, so the active set is never mutated from two
//! execution contexts.

use crate::error::EngineError;
use crate::finished::FinishedJobStore;
use crate::poller::Poller;
use crate::process::{ProcessAdapter, SpawnSpec};
use crate::queue::QueueSet;
use spool_core::{Clock, Event, FinishedJob, JobSpec, JobState, RunningJob};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default signal delivered on cancellation.
pub const DEFAULT_CANCEL_SIGNAL: &str = "TERM";

pub struct Launcher<P, C: Clock> {
    adapter: Arc<P>,
    clock: C,
    active: Vec<RunningJob>,
    max_procs: usize,
    runner: String,
    logs_dir: PathBuf,
    items_dir: PathBuf,
    finished: FinishedJobStore,
    event_tx: mpsc::Sender<Event>,
}

impl<P, C> Launcher<P, C>
where
    P: ProcessAdapter,
    C: Clock,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        adapter: Arc<P>,
        clock: C,
        max_procs: usize,
        runner: String,
        logs_dir: PathBuf,
        items_dir: PathBuf,
        finished: FinishedJobStore,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            adapter,
            clock,
            active: Vec::new(),
            max_procs,
            runner,
            logs_dir,
            items_dir,
            finished,
            event_tx,
        }
    }

    /// Promote pending jobs while capacity remains. A tick at the cap
    /// declines and waits for the next one; nothing is queued for later.
    pub fn tick(&mut self, poller: &mut Poller, queues: &mut QueueSet) {
        if self.active.len() >= self.max_procs {
            tracing::debug!(
                active = self.active.len(),
                max_procs = self.max_procs,
                "at capacity, deferring"
            );
            return;
        }
        while self.active.len() < self.max_procs {
            let Some(spec) = poller.poll(queues) else { break };
            if let Err(e) = self.start_job(spec) {
                // Spawn failure: reported and dropped, never retried.
                tracing::error!(error = %e, "failed to start job");
            }
        }
    }

    fn start_job(&mut self, spec: JobSpec) -> Result<(), EngineError> {
        let log_path = self
            .logs_dir
            .join(&spec.project)
            .join(&spec.spider)
            .join(format!("{}.log", spec.job_id));
        let items_path = self
            .items_dir
            .join(&spec.project)
            .join(&spec.spider)
            .join(format!("{}.jl", spec.job_id));

        let mut env: Vec<(String, String)> = vec![
            ("SPOOL_PROJECT".into(), spec.project.clone()),
            ("SPOOL_SPIDER".into(), spec.spider.clone()),
            ("SPOOL_JOB".into(), spec.job_id.to_string()),
            ("SPOOL_ITEMS_FILE".into(), items_path.display().to_string()),
        ];
        if let Some(version) = &spec.version {
            env.push(("SPOOL_EGG_VERSION".into(), version.clone()));
        }
        for (key, value) in &spec.settings {
            env.push((key.clone(), value.clone()));
        }

        let mut args = vec!["crawl".to_string()];
        args.extend(spec.args.iter().cloned());

        let spawn = SpawnSpec {
            project: spec.project.clone(),
            spider: spec.spider.clone(),
            job_id: spec.job_id.clone(),
            program: self.runner.clone(),
            args,
            env,
            log_path: log_path.clone(),
        };

        let handle = self.adapter.spawn(spawn, self.event_tx.clone())?;
        self.active.push(RunningJob {
            spec,
            start_ms: self.clock.epoch_ms(),
            pid: handle.pid,
            log_path,
            items_path,
        });
        Ok(())
    }

    /// Apply a process-exit notification: move the job from the active set
    /// to the finished store. Crash vs. success is not distinguished.
    pub fn handle_exit(
        &mut self,
        pid: u32,
        exit_code: Option<i32>,
    ) -> Result<(), EngineError> {
        let Some(idx) = self.active.iter().position(|job| job.pid == pid) else {
            tracing::warn!(pid, "exit notification for unknown process");
            return Ok(());
        };
        let job = self.active.remove(idx);
        let end_ms = self.clock.epoch_ms();
        tracing::info!(
            project = %job.spec.project,
            job_id = %job.spec.job_id,
            pid,
            exit = ?exit_code,
            "job finished"
        );
        self.finished.add(FinishedJob {
            project: job.spec.project,
            spider: job.spec.spider,
            job_id: job.spec.job_id,
            start_ms: job.start_ms,
            end_ms,
            exit_code,
        })
    }

    /// Cancel a job, reporting its prior state.
    ///
    /// Pending: exactly one matching queue entry is removed per call.
    /// Running: every active process sharing (project, job_id) is signaled —
    /// duplicates submitted under one id all receive the signal. The job
    /// stays "running" until its exit notification actually arrives.
    /// Neither: `None`, an idempotent no-op.
    pub fn cancel(
        &mut self,
        queues: &mut QueueSet,
        project: &str,
        job_id: &str,
        signal: Option<&str>,
    ) -> Result<Option<JobState>, EngineError> {
        if let Some(queue) = queues.get_mut(project) {
            if queue.remove_one(job_id) {
                tracing::info!(project, job_id, "pending job cancelled");
                return Ok(Some(JobState::Pending));
            }
        }

        let matching: Vec<u32> = self
            .active
            .iter()
            .filter(|job| job.spec.project == project && job.spec.job_id == job_id)
            .map(|job| job.pid)
            .collect();
        if !matching.is_empty() {
            let signal = signal.unwrap_or(DEFAULT_CANCEL_SIGNAL);
            for pid in matching {
                if let Err(e) = self.adapter.signal(pid, signal) {
                    // The process may have exited between observation and
                    // delivery; the exit event will reconcile the set.
                    tracing::warn!(pid, signal, error = %e, "cancel signal failed");
                }
            }
            return Ok(Some(JobState::Running));
        }

        Ok(None)
    }

    pub fn active(&self) -> &[RunningJob] {
        &self.active
    }

    pub fn finished(&self) -> &FinishedJobStore {
        &self.finished
    }

    pub fn max_procs(&self) -> usize {
        self.max_procs
    }
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
