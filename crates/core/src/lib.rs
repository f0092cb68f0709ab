// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spool-core: identifiers, job data model, and scheduling events for the
//! spool job-supervision engine.

pub mod macros;

pub mod clock;
pub mod event;
pub mod id;
pub mod job;
pub mod name;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use event::Event;
pub use id::JobId;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobSpecBuilder;
pub use job::{FinishedJob, JobSpec, JobState, RunningJob};
pub use name::{validate_name, NameError};
