// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events delivered asynchronously into the scheduling loop.
//!
//! Process-layer notifications are never applied from the notifying task;
//! they are queued on the engine's event channel and drained by the single
//! scheduling loop, interleaved with ticks, so the active set and the
//! per-project queues are only ever mutated under one discipline.

use crate::id::JobId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A launched process exited (normally or by crash — not distinguished).
    ProcessExited {
        project: String,
        spider: String,
        job_id: JobId,
        pid: u32,
        exit_code: Option<i32>,
    },
}

impl Event {
    /// One-line summary for activity logging.
    pub fn log_summary(&self) -> String {
        match self {
            Event::ProcessExited { project, job_id, pid, exit_code, .. } => {
                format!(
                    "process:exited project={project} job={job_id} pid={pid} exit={}",
                    exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string())
                )
            }
        }
    }
}
