// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration, loadable from TOML with full defaults.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine tunables. Every field has a default so an empty config is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Hard ceiling on concurrently running job processes.
    pub max_procs: usize,
    /// Scheduling-loop tick interval.
    pub poll_interval_ms: u64,
    /// Finished jobs retained in memory before eviction to durable history.
    pub finished_to_keep: usize,
    /// Program invoked to run and enumerate spiders.
    pub runner: String,
    /// Root for per-job log files (`<logs>/<project>/<spider>/<job>.log`).
    pub logs_dir: PathBuf,
    /// Root for per-job item feeds (`<items>/<project>/<spider>/<job>.jl`).
    pub items_dir: PathBuf,
    /// Root for stored artifacts.
    pub eggs_dir: PathBuf,
    /// JSON-lines file receiving finished jobs evicted from memory.
    pub history_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_procs: 4,
            poll_interval_ms: 5_000,
            finished_to_keep: 100,
            runner: "spool-runner".to_string(),
            logs_dir: PathBuf::from("logs"),
            items_dir: PathBuf::from("items"),
            eggs_dir: PathBuf::from("eggs"),
            history_file: PathBuf::from("history.jsonl"),
        }
    }
}

impl EngineConfig {
    /// Parse from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
