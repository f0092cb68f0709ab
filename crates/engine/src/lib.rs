// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spool-engine: job queueing and process supervision.
//!
//! The engine queues spider jobs per project, promotes them through a
//! round-robin poller, launches them as OS processes under a concurrency
//! cap, and tracks each job through pending → running → finished. A single
//! scheduling loop drains ticks and process-exit events in one place; the
//! synchronous query/mutation surface locks the shared state.

pub mod cache;
pub mod config;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod finished;
pub mod launcher;
pub mod poller;
pub mod process;
pub mod queue;
pub mod registry;
pub mod status;

pub use cache::SpiderNameCache;
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineState, ScheduleReport};
pub use enumerate::{CommandEnumerator, SpiderEnumerator};
pub use error::EngineError;
pub use finished::FinishedJobStore;
pub use launcher::Launcher;
pub use poller::Poller;
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessAdapter;
pub use process::{LocalProcessAdapter, ProcessAdapter, ProcessError, SpawnedProcess, SpawnSpec};
pub use queue::{JobQueue, QueueSet};
pub use registry::ProjectRegistry;
pub use status::{DaemonStatus, FinishedEntry, JobListing, PendingEntry, RunningEntry};
