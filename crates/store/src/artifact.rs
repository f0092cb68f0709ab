// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned artifact storage.
//!
//! Artifacts are immutable bundles keyed by (project, version). The
//! filesystem implementation lays them out as `<dir>/<project>/<version>.egg`
//! and refuses — never normalizes — identifiers carrying path-traversal
//! material.

use crate::version;
use spool_core::{validate_name, NameError};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier rejected before any path construction.
    #[error(transparent)]
    DirectoryTraversal(#[from] NameError),
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
    #[error("artifact storage i/o error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    fn project_not_found(project: &str) -> Self {
        StoreError::NotFound { kind: "project", name: project.to_string() }
    }

    fn version_not_found(version: &str) -> Self {
        StoreError::NotFound { kind: "version", name: version.to_string() }
    }
}

/// Storage backend for versioned project artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Store an artifact under (project, version). Overwrites silently.
    fn put(&self, project: &str, version: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Fetch an artifact. `None` version means latest. Returns the resolved
    /// version name alongside the bytes, or `Ok(None)` when absent.
    fn get(
        &self,
        project: &str,
        version: Option<&str>,
    ) -> Result<Option<(String, Vec<u8>)>, StoreError>;

    /// Stored version names for a project, sorted oldest-first. A project
    /// with no artifacts yields an empty list, not an error.
    fn list(&self, project: &str) -> Result<Vec<String>, StoreError>;

    /// Projects that currently have at least one stored artifact, sorted.
    fn list_projects(&self) -> Result<Vec<String>, StoreError>;

    /// Delete one version, or every version when `version` is `None`.
    /// Removing the last version removes the project from listings.
    fn delete(&self, project: &str, version: Option<&str>) -> Result<(), StoreError>;
}

/// Filesystem-backed artifact store.
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn project_dir(&self, project: &str) -> Result<PathBuf, StoreError> {
        validate_name("project", project)?;
        Ok(self.dir.join(project))
    }

    fn artifact_path(&self, project: &str, version: &str) -> Result<PathBuf, StoreError> {
        validate_name("version", version)?;
        Ok(self.project_dir(project)?.join(format!("{}.egg", version::sanitize(version))))
    }

    /// Sorted version stems present on disk, oldest-first.
    fn versions_on_disk(&self, project: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.project_dir(project)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut versions = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("egg") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    versions.push(stem.to_string());
                }
            }
        }
        versions.sort_by(|a, b| version::compare(a, b));
        Ok(versions)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&self, project: &str, version: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.artifact_path(project, version)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        tracing::debug!(project, version, path = %path.display(), "artifact stored");
        Ok(())
    }

    fn get(
        &self,
        project: &str,
        version: Option<&str>,
    ) -> Result<Option<(String, Vec<u8>)>, StoreError> {
        let resolved = match version {
            Some(v) => {
                validate_name("version", v)?;
                version::sanitize(v)
            }
            None => match self.versions_on_disk(project)?.pop() {
                Some(latest) => latest,
                None => return Ok(None),
            },
        };
        let path = self.artifact_path(project, &resolved)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some((resolved, data))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, project: &str) -> Result<Vec<String>, StoreError> {
        self.versions_on_disk(project)
    }

    fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut projects = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                // Empty project dirs (all versions deleted) are not projects
                if !self.versions_on_disk(name)?.is_empty() {
                    projects.push(name.to_string());
                }
            }
        }
        projects.sort();
        Ok(projects)
    }

    fn delete(&self, project: &str, version: Option<&str>) -> Result<(), StoreError> {
        match version {
            Some(v) => {
                let path = self.artifact_path(project, v)?;
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(StoreError::version_not_found(v));
                    }
                    Err(e) => return Err(e.into()),
                }
                // Drop the project dir once its last version is gone
                if self.versions_on_disk(project)?.is_empty() {
                    let _ = fs::remove_dir(self.project_dir(project)?);
                }
                tracing::info!(project, version = v, "artifact version deleted");
                Ok(())
            }
            None => {
                let dir = self.project_dir(project)?;
                match fs::remove_dir_all(&dir) {
                    Ok(()) => {
                        tracing::info!(project, "project artifacts deleted");
                        Ok(())
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        Err(StoreError::project_not_found(project))
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
