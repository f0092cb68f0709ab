// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spider-name enumeration via the external runner.
//!
//! Enumeration spawns the configured runner in `list` mode and parses its
//! stdout. The call blocks for the lifetime of that process; callers treat
//! it as slow and synchronous and apply any timeout at the call site.

use crate::error::EngineError;
use std::path::PathBuf;
use std::process::Command;

/// Enumerate spider names bundled in a project's artifact.
pub trait SpiderEnumerator: Send + Sync {
    fn enumerate(&self, project: &str, version: Option<&str>) -> Result<Vec<String>, EngineError>;
}

/// Enumerator that shells out to the runner program with a `list` argument.
///
/// The target project and pinned version travel in the environment
/// (`SPOOL_PROJECT`, `SPOOL_EGG_VERSION`), matching the contract of the
/// launch path.
pub struct CommandEnumerator {
    runner: String,
    eggs_dir: PathBuf,
}

impl CommandEnumerator {
    pub fn new(runner: impl Into<String>, eggs_dir: impl Into<PathBuf>) -> Self {
        Self { runner: runner.into(), eggs_dir: eggs_dir.into() }
    }
}

impl SpiderEnumerator for CommandEnumerator {
    fn enumerate(&self, project: &str, version: Option<&str>) -> Result<Vec<String>, EngineError> {
        let mut cmd = Command::new(&self.runner);
        cmd.arg("list")
            .env("SPOOL_PROJECT", project)
            .env("SPOOL_EGGS_DIR", &self.eggs_dir);
        if let Some(version) = version {
            cmd.env("SPOOL_EGG_VERSION", version);
        }

        let output = cmd
            .output()
            .map_err(|e| EngineError::RunnerFailed(format!("{}: {e}", self.runner)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| EngineError::RunnerFailed(format!("undecodable runner output: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(project, ?version, status = %output.status, "spider enumeration failed");
            return Err(EngineError::RunnerFailed(format!("{stdout}{stderr}")));
        }

        let mut spiders: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        spiders.sort();
        Ok(spiders)
    }
}

#[cfg(test)]
#[path = "enumerate_tests.rs"]
mod tests;
