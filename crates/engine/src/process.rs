// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process layer: spawning, signalling, and exit notification.
//!
//! Exit notifications are pushed onto the engine's event channel by a
//! per-process reaper task; nothing in this module mutates engine state.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use spool_core::{Event, JobId};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },
    #[error("failed to signal pid {pid}: {message}")]
    SignalFailed { pid: u32, message: String },
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("failed to prepare output sink: {0}")]
    Sink(#[from] std::io::Error),
}

/// Everything needed to launch one job process.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub project: String,
    pub spider: String,
    pub job_id: JobId,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    /// stdout and stderr are both redirected here.
    pub log_path: PathBuf,
}

/// Handle returned by a successful spawn.
#[derive(Debug, Clone, Copy)]
pub struct SpawnedProcess {
    pub pid: u32,
}

/// Seam between the launcher and the OS process layer.
///
/// Spawning is synchronous; exit reporting is not. Implementations must be
/// callable from within a tokio runtime (the local adapter registers a
/// reaper task at spawn time).
pub trait ProcessAdapter: Send + Sync {
    /// Spawn a process. The adapter sends [`Event::ProcessExited`] on
    /// `events` when the process terminates, however it terminates.
    fn spawn(
        &self,
        spec: SpawnSpec,
        events: mpsc::Sender<Event>,
    ) -> Result<SpawnedProcess, ProcessError>;

    /// Deliver a named signal (e.g. `"TERM"`) to a live process.
    fn signal(&self, pid: u32, signal: &str) -> Result<(), ProcessError>;
}

fn parse_signal(name: &str) -> Result<Signal, ProcessError> {
    let upper = name.to_ascii_uppercase();
    let full = if upper.starts_with("SIG") { upper } else { format!("SIG{upper}") };
    match full.as_str() {
        "SIGTERM" => Ok(Signal::SIGTERM),
        "SIGKILL" => Ok(Signal::SIGKILL),
        "SIGINT" => Ok(Signal::SIGINT),
        "SIGHUP" => Ok(Signal::SIGHUP),
        "SIGQUIT" => Ok(Signal::SIGQUIT),
        "SIGUSR1" => Ok(Signal::SIGUSR1),
        "SIGUSR2" => Ok(Signal::SIGUSR2),
        _ => Err(ProcessError::UnknownSignal(name.to_string())),
    }
}

/// Adapter spawning real OS processes via tokio.
#[derive(Default)]
pub struct LocalProcessAdapter;

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessAdapter for LocalProcessAdapter {
    fn spawn(
        &self,
        spec: SpawnSpec,
        events: mpsc::Sender<Event>,
    ) -> Result<SpawnedProcess, ProcessError> {
        if let Some(parent) = spec.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stdout = std::fs::File::create(&spec.log_path)?;
        let stderr = stdout.try_clone()?;

        let mut cmd = tokio::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|e| ProcessError::SpawnFailed {
            program: spec.program.clone(),
            message: e.to_string(),
        })?;
        let pid = child.id().ok_or_else(|| ProcessError::SpawnFailed {
            program: spec.program.clone(),
            message: "process exited before pid was observed".to_string(),
        })?;

        tracing::info!(
            project = %spec.project,
            spider = %spec.spider,
            job_id = %spec.job_id,
            pid,
            log = %spec.log_path.display(),
            "job process spawned"
        );

        // Reaper task: waits for exit and queues the notification; the
        // scheduling loop applies it. Also prevents zombies.
        tokio::spawn(async move {
            let exit_code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    tracing::error!(pid, error = %e, "failed to wait on job process");
                    None
                }
            };
            let _ = events
                .send(Event::ProcessExited {
                    project: spec.project,
                    spider: spec.spider,
                    job_id: spec.job_id,
                    pid,
                    exit_code,
                })
                .await;
        });

        Ok(SpawnedProcess { pid })
    }

    fn signal(&self, pid: u32, signal: &str) -> Result<(), ProcessError> {
        let sig = parse_signal(signal)?;
        kill(Pid::from_raw(pid as i32), sig)
            .map_err(|e| ProcessError::SignalFailed { pid, message: e.to_string() })
    }
}

/// Recording adapter for tests: spawns nothing, exits on demand.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeProcessAdapter {
    state: parking_lot::Mutex<FakeState>,
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
struct FakeState {
    next_pid: u32,
    fail_next: bool,
    live: Vec<(SpawnSpec, u32, mpsc::Sender<Event>)>,
    spawned: Vec<SpawnSpec>,
    signaled: Vec<(u32, String)>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self { state: parking_lot::Mutex::new(FakeState { next_pid: 1000, ..Default::default() }) }
    }

    /// Make the next spawn fail with a synthetic error.
    pub fn fail_next_spawn(&self) {
        self.state.lock().fail_next = true;
    }

    /// Every spec passed to `spawn`, in order.
    pub fn spawned(&self) -> Vec<SpawnSpec> {
        self.state.lock().spawned.clone()
    }

    /// Signals delivered via `signal`, in order.
    pub fn signaled(&self) -> Vec<(u32, String)> {
        self.state.lock().signaled.clone()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }

    /// Queue an exit notification for a live fake process. Returns false if
    /// the pid is unknown or the event channel is gone.
    pub fn exit(&self, pid: u32, exit_code: Option<i32>) -> bool {
        let entry = {
            let mut state = self.state.lock();
            match state.live.iter().position(|(_, p, _)| *p == pid) {
                Some(idx) => state.live.remove(idx),
                None => return false,
            }
        };
        let (spec, pid, tx) = entry;
        tx.try_send(Event::ProcessExited {
            project: spec.project,
            spider: spec.spider,
            job_id: spec.job_id,
            pid,
            exit_code,
        })
        .is_ok()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeProcessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ProcessAdapter for FakeProcessAdapter {
    fn spawn(
        &self,
        spec: SpawnSpec,
        events: mpsc::Sender<Event>,
    ) -> Result<SpawnedProcess, ProcessError> {
        let mut state = self.state.lock();
        if state.fail_next {
            state.fail_next = false;
            return Err(ProcessError::SpawnFailed {
                program: spec.program.clone(),
                message: "injected spawn failure".to_string(),
            });
        }
        state.next_pid += 1;
        let pid = state.next_pid;
        state.spawned.push(spec.clone());
        state.live.push((spec, pid, events));
        Ok(SpawnedProcess { pid })
    }

    fn signal(&self, pid: u32, signal: &str) -> Result<(), ProcessError> {
        parse_signal(signal)?;
        self.state.lock().signaled.push((pid, signal.to_string()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
