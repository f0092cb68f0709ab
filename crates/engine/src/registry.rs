// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only project/version view over the artifact store.
//!
//! Every lookup validates the externally-supplied identifier first; a
//! traversal attempt produces the same not-found shape as genuine absence.

use crate::error::EngineError;
use spool_core::validate_name;
use spool_store::ArtifactStore;
use std::sync::Arc;

/// Validating facade the engine consults for "does this exist" questions.
#[derive(Clone)]
pub struct ProjectRegistry {
    store: Arc<dyn ArtifactStore>,
}

impl ProjectRegistry {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Projects with at least one stored artifact, sorted.
    pub fn projects(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.list_projects()?)
    }

    /// Stored versions for a project, oldest-first. Unknown projects yield
    /// an empty list.
    pub fn versions(&self, project: &str) -> Result<Vec<String>, EngineError> {
        validate_name("project", project)?;
        Ok(self.store.list(project)?)
    }

    pub fn latest_version(&self, project: &str) -> Result<Option<String>, EngineError> {
        Ok(self.versions(project)?.pop())
    }

    /// Error unless the project has at least one stored version.
    pub fn require_project(&self, project: &str) -> Result<(), EngineError> {
        if self.versions(project)?.is_empty() {
            return Err(EngineError::not_found("project", project));
        }
        Ok(())
    }

    /// Error unless (project, version) resolves to a stored artifact.
    pub fn require_version(&self, project: &str, version: &str) -> Result<(), EngineError> {
        validate_name("version", version)?;
        if self.store.get(project, Some(version))?.is_none() {
            return Err(EngineError::not_found("version", version));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
