// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project spider-name cache.
//!
//! Enumerating spider names spawns an external process, so results are
//! memoized keyed by project only — NOT by version. A populated entry is
//! returned even when a later call names a different version; that
//! staleness is a deliberate contract (avoid repeated expensive spawns),
//! paid for with explicit [`SpiderNameCache::delete`] by whoever mutates a
//! project's version set. The cache never inspects version history to
//! auto-invalidate. Failed computations are never cached.

use crate::error::EngineError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CacheEntry {
    spiders: Vec<String>,
    /// Version the entry was computed under, for diagnostics only.
    version: Option<String>,
}

/// Memoized spider-name listings, owned by the engine instance (no process
/// globals — tests construct isolated caches).
#[derive(Debug, Default)]
pub struct SpiderNameCache {
    entries: HashMap<String, CacheEntry>,
}

impl SpiderNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached spider names for `project`, computing on miss.
    ///
    /// `compute` may block for the duration of an external process
    /// invocation; its errors propagate uncached so the next call retries.
    pub fn get<F>(
        &mut self,
        project: &str,
        version: Option<&str>,
        compute: F,
    ) -> Result<Vec<String>, EngineError>
    where
        F: FnOnce(&str, Option<&str>) -> Result<Vec<String>, EngineError>,
    {
        if let Some(entry) = self.entries.get(project) {
            if entry.version.as_deref() != version {
                tracing::debug!(
                    project,
                    cached_version = ?entry.version,
                    requested_version = ?version,
                    "serving stale spider list; delete() to recompute"
                );
            }
            return Ok(entry.spiders.clone());
        }

        let spiders = compute(project, version)?;
        tracing::info!(project, ?version, count = spiders.len(), "spider list cached");
        self.entries.insert(
            project.to_string(),
            CacheEntry { spiders: spiders.clone(), version: version.map(String::from) },
        );
        Ok(spiders)
    }

    /// Evict a project's entry unconditionally, whether or not the version
    /// it was computed under still exists.
    pub fn delete(&mut self, project: &str) {
        if self.entries.remove(project).is_some() {
            tracing::debug!(project, "spider list evicted");
        }
    }

    pub fn contains(&self, project: &str) -> bool {
        self.entries.contains_key(project)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
