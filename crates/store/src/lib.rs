// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! spool-store: versioned artifact storage and the durable finished-job
//! history — the external collaborators of the supervision engine.

pub mod artifact;
pub mod history;
pub mod version;

pub use artifact::{ArtifactStore, FsArtifactStore, StoreError};
pub use history::{HistoryError, JobHistory, JsonlHistory, MemoryHistory};
