// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: composition root and scheduling runtime.
//!
//! All mutable scheduling state lives in one [`EngineState`] behind a
//! `parking_lot::Mutex`. The synchronous operation surface (the methods an
//! HTTP or CLI layer would map onto) locks it briefly; process-exit
//! notifications are queued on an mpsc channel and drained by the single
//! [`Engine::run`] loop, interleaved with fixed-interval ticks. No lock is
//! held across an await point and no two scheduling passes run concurrently.

use crate::cache::SpiderNameCache;
use crate::config::EngineConfig;
use crate::enumerate::{CommandEnumerator, SpiderEnumerator};
use crate::error::EngineError;
use crate::finished::FinishedJobStore;
use crate::launcher::Launcher;
use crate::poller::Poller;
use crate::process::{LocalProcessAdapter, ProcessAdapter};
use crate::queue::QueueSet;
use crate::registry::ProjectRegistry;
use crate::status::{DaemonStatus, JobListing, StatusView};
use parking_lot::Mutex;
use serde::Serialize;
use spool_core::{validate_name, Clock, Event, JobId, JobSpec, JobState, SystemClock};
use spool_store::{ArtifactStore, FsArtifactStore, JobHistory, JsonlHistory};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// Exit notifications are tiny and the loop drains eagerly; a modest buffer
// only has to absorb bursts between scheduling passes.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Outcome of a successful `schedule` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    pub job_id: JobId,
    /// Pending jobs in the project's queue after this submission.
    pub pending: usize,
}

/// Mutable scheduling state, locked as one unit.
pub struct EngineState<P, C: Clock> {
    queues: QueueSet,
    poller: Poller,
    launcher: Launcher<P, C>,
    cache: SpiderNameCache,
}

pub struct Engine<P, C: Clock> {
    state: Arc<Mutex<EngineState<P, C>>>,
    registry: ProjectRegistry,
    enumerator: Arc<dyn SpiderEnumerator>,
    poll_interval: Duration,
    // Taken by the first run() call; tick_now() drains it in place when no
    // loop is running.
    event_rx: Mutex<Option<mpsc::Receiver<Event>>>,
}

impl Engine<LocalProcessAdapter, SystemClock> {
    /// Wire up an engine on local defaults: filesystem artifact store,
    /// JSON-lines history, and the command-line spider enumerator, all
    /// rooted at the paths in `config`.
    pub fn local(config: EngineConfig) -> Self {
        let store = Arc::new(FsArtifactStore::new(config.eggs_dir.clone()));
        let history = Arc::new(JsonlHistory::new(config.history_file.clone()));
        let enumerator =
            Arc::new(CommandEnumerator::new(config.runner.clone(), config.eggs_dir.clone()));
        Self::new(
            config,
            store,
            history,
            enumerator,
            Arc::new(LocalProcessAdapter::new()),
            SystemClock,
        )
    }
}

impl<P, C> Engine<P, C>
where
    P: ProcessAdapter,
    C: Clock,
{
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn ArtifactStore>,
        history: Arc<dyn JobHistory>,
        enumerator: Arc<dyn SpiderEnumerator>,
        adapter: Arc<P>,
        clock: C,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let finished = FinishedJobStore::new(config.finished_to_keep, history);
        let launcher = Launcher::new(
            adapter,
            clock,
            config.max_procs,
            config.runner.clone(),
            config.logs_dir.clone(),
            config.items_dir.clone(),
            finished,
            event_tx,
        );
        Self {
            state: Arc::new(Mutex::new(EngineState {
                queues: QueueSet::new(),
                poller: Poller::new(),
                launcher,
                cache: SpiderNameCache::new(),
            })),
            registry: ProjectRegistry::new(store),
            enumerator,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            event_rx: Mutex::new(Some(event_rx)),
        }
    }

    /// The scheduling loop: fixed-interval ticks interleaved with queued
    /// exit notifications, forever. Idempotent across calls — the loop runs
    /// at most once per engine.
    pub async fn run(&self) {
        let Some(mut events) = self.event_rx.lock().take() else {
            tracing::warn!("scheduling loop already started");
            return;
        };
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(poll_interval = ?self.poll_interval, "scheduling loop started");
        loop {
            tokio::select! {
                _ = interval.tick() => self.pass(),
                event = events.recv() => match event {
                    Some(event) => self.apply_event(event),
                    None => break,
                },
            }
        }
        tracing::info!("scheduling loop stopped");
    }

    /// Drain queued exit notifications and run one scheduling pass, now.
    /// [`Engine::run`] does this continuously; embedders and tests that do
    /// not spawn the loop drive the engine through here.
    pub fn tick_now(&self) {
        if let Some(events) = self.event_rx.lock().as_mut() {
            while let Ok(event) = events.try_recv() {
                self.apply_event(event);
            }
        }
        self.pass();
    }

    fn pass(&self) {
        let mut state = self.state.lock();
        let EngineState { queues, poller, launcher, .. } = &mut *state;
        launcher.tick(poller, queues);
    }

    fn apply_event(&self, event: Event) {
        tracing::debug!(event = %event.log_summary(), "event received");
        let Event::ProcessExited { pid, exit_code, .. } = event;
        let mut state = self.state.lock();
        let EngineState { queues, poller, launcher, .. } = &mut *state;
        if let Err(e) = launcher.handle_exit(pid, exit_code) {
            tracing::error!(pid, error = %e, "failed to record finished job");
        }
        // A slot just freed; refill without waiting for the next interval.
        launcher.tick(poller, queues);
    }

    /// Validate and enqueue a job. The job starts on a later scheduling
    /// pass, capacity permitting.
    pub fn schedule(&self, spec: JobSpec) -> Result<ScheduleReport, EngineError> {
        validate_name("project", &spec.project)?;
        validate_name("spider", &spec.spider)?;
        validate_name("job", spec.job_id.as_str())?;
        self.registry.require_project(&spec.project)?;
        if let Some(version) = &spec.version {
            self.registry.require_version(&spec.project, version)?;
        }
        let spiders = self.spiders_cached(&spec.project, spec.version.as_deref())?;
        if !spiders.iter().any(|s| s == &spec.spider) {
            return Err(EngineError::not_found("spider", &spec.spider));
        }

        let mut state = self.state.lock();
        let project = spec.project.clone();
        let job_id = state.queues.add(spec);
        let pending = state.queues.get(&project).map_or(0, |q| q.len());
        tracing::info!(%project, %job_id, pending, "job queued");
        Ok(ScheduleReport { job_id, pending })
    }

    /// Cancel a job, reporting the state it was in (`None` when absent).
    pub fn cancel(
        &self,
        project: &str,
        job_id: &str,
        signal: Option<&str>,
    ) -> Result<Option<JobState>, EngineError> {
        validate_name("project", project)?;
        self.registry.require_project(project)?;
        let mut state = self.state.lock();
        let EngineState { queues, launcher, .. } = &mut *state;
        launcher.cancel(queues, project, job_id, signal)
    }

    /// Current state of a job id, or `None` when it is nowhere.
    pub fn status(
        &self,
        project: Option<&str>,
        job_id: &str,
    ) -> Result<Option<JobState>, EngineError> {
        if let Some(project) = project {
            validate_name("project", project)?;
        }
        let state = self.state.lock();
        StatusView::new(&state.queues, state.launcher.active(), state.launcher.finished())
            .job_state(project, job_id)
    }

    /// Pending, running, and finished jobs, optionally for one project.
    pub fn list_jobs(&self, project: Option<&str>) -> Result<JobListing, EngineError> {
        if let Some(project) = project {
            validate_name("project", project)?;
            self.registry.require_project(project)?;
        }
        let state = self.state.lock();
        StatusView::new(&state.queues, state.launcher.active(), state.launcher.finished())
            .list_jobs(project)
    }

    /// Spider names in a project's artifact, served from the per-project
    /// cache. The version only matters on a cache miss.
    pub fn list_spiders(
        &self,
        project: &str,
        version: Option<&str>,
    ) -> Result<Vec<String>, EngineError> {
        validate_name("project", project)?;
        self.registry.require_project(project)?;
        if let Some(version) = version {
            self.registry.require_version(project, version)?;
        }
        self.spiders_cached(project, version)
    }

    /// Stored versions, oldest-first. Unknown projects yield an empty list.
    pub fn list_versions(&self, project: &str) -> Result<Vec<String>, EngineError> {
        self.registry.versions(project)
    }

    /// Projects with at least one stored artifact, sorted.
    pub fn list_projects(&self) -> Result<Vec<String>, EngineError> {
        self.registry.projects()
    }

    /// Store an artifact version and evict the project's spider cache.
    /// Returns the spider count enumerated from the fresh artifact.
    pub fn add_version(
        &self,
        project: &str,
        version: &str,
        data: &[u8],
    ) -> Result<usize, EngineError> {
        validate_name("project", project)?;
        validate_name("version", version)?;
        self.registry.store().put(project, version, data)?;
        self.state.lock().cache.delete(project);
        let spiders = self.spiders_cached(project, Some(version))?;
        tracing::info!(project, version, spiders = spiders.len(), "artifact version stored");
        Ok(spiders.len())
    }

    /// Delete one stored version. When it was the last one, the project
    /// disappears: its queue is pruned along with the cache entry.
    pub fn delete_version(&self, project: &str, version: &str) -> Result<(), EngineError> {
        self.registry.store().delete(project, Some(version))?;
        let gone = self.registry.versions(project)?.is_empty();
        let mut state = self.state.lock();
        state.cache.delete(project);
        if gone {
            let dropped = state.queues.remove_project(project);
            tracing::info!(project, version, dropped, "last version deleted, project pruned");
        } else {
            tracing::info!(project, version, "version deleted");
        }
        Ok(())
    }

    /// Delete a project and every stored version, pruning its queue and
    /// cache entry. Running jobs are left to finish.
    pub fn delete_project(&self, project: &str) -> Result<(), EngineError> {
        self.registry.store().delete(project, None)?;
        let mut state = self.state.lock();
        state.cache.delete(project);
        let dropped = state.queues.remove_project(project);
        tracing::info!(project, dropped, "project deleted");
        Ok(())
    }

    /// Pending/running/finished counts for liveness reporting.
    pub fn daemon_status(&self) -> DaemonStatus {
        let state = self.state.lock();
        StatusView::new(&state.queues, state.launcher.active(), state.launcher.finished())
            .daemon_status()
    }

    fn spiders_cached(
        &self,
        project: &str,
        version: Option<&str>,
    ) -> Result<Vec<String>, EngineError> {
        // Enumeration shells out and blocks; the lock is held for the
        // duration of a miss, which serializes concurrent first lookups of
        // the same project instead of racing duplicate processes.
        let mut state = self.state.lock();
        state.cache.get(project, version, |p, v| self.enumerator.enumerate(p, v))
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
