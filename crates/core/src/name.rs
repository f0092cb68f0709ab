// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation for externally-supplied identifiers.
//!
//! Project, version, spider, and job identifiers are used as map keys and as
//! path segments for artifact and log storage. Every boundary that accepts
//! one validates it here before any path construction — the check is
//! centralized rather than trusted to have happened upstream.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    /// The identifier contains path-traversal material. Callers answering
    /// external requests surface this with the same shape as "not found" so
    /// the response neither confirms nor denies the traversal target.
    #[error("{kind} '{name}' is not a valid identifier")]
    DirectoryTraversal { kind: &'static str, name: String },

    #[error("{kind} is required and must be non-empty")]
    Empty { kind: &'static str },
}

/// Validate an externally-supplied identifier before using it as a storage
/// key or path segment.
///
/// Rejects empty strings, `..` components, path separators, and NUL bytes.
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty { kind });
    }
    let traversal = name == ".."
        || name.contains("../")
        || name.contains("..\\")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if traversal {
        return Err(NameError::DirectoryTraversal { kind, name: name.to_string() });
    }
    Ok(())
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
