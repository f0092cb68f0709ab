// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! Traversal attempts against externally-supplied identifiers surface as
//! [`EngineError::NotFound`] with the same message shape as genuine
//! absence, so callers learn nothing about the traversal target. Capacity
//! deferral is not an error and has no variant — a full tick simply
//! declines to start work.

use spool_core::NameError;
use spool_store::{HistoryError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown project/version/spider/job — includes traversal attempts,
    /// deliberately indistinguishable from genuine absence.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Malformed or missing required parameter.
    #[error("{0}")]
    Validation(String),

    /// The external enumeration/execution process errored; carries the
    /// captured diagnostic output. Never cached as a negative result.
    #[error("spider runner failed:\n{0}")]
    RunnerFailed(String),

    #[error(transparent)]
    Process(#[from] crate::process::ProcessError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("artifact storage error: {0}")]
    Store(StoreError),
}

impl EngineError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        EngineError::NotFound { kind, name: name.into() }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            // Traversal rejections and store-level absence both present as
            // plain not-found to external callers.
            StoreError::DirectoryTraversal(NameError::DirectoryTraversal { kind, name }) => {
                EngineError::NotFound { kind, name }
            }
            StoreError::DirectoryTraversal(NameError::Empty { kind }) => {
                EngineError::Validation(format!("{kind} is required and must be non-empty"))
            }
            StoreError::NotFound { kind, name } => EngineError::NotFound { kind, name },
            other => EngineError::Store(other),
        }
    }
}

impl From<NameError> for EngineError {
    fn from(e: NameError) -> Self {
        match e {
            NameError::DirectoryTraversal { kind, name } => EngineError::NotFound { kind, name },
            NameError::Empty { kind } => {
                EngineError::Validation(format!("{kind} is required and must be non-empty"))
            }
        }
    }
}
