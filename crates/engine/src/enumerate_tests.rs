// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn write_runner(dir: &TempDir, script: &str) -> String {
    let path = dir.path().join("runner.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn parses_sorted_nonempty_lines() {
    let dir = TempDir::new().unwrap();
    let runner = write_runner(&dir, "printf 'zeta\\n\\nalpha\\n'");
    let enumerator = CommandEnumerator::new(runner, dir.path());

    let spiders = enumerator.enumerate("p1", None).unwrap();
    assert_eq!(spiders, vec!["alpha", "zeta"]);
}

#[test]
fn project_and_version_travel_in_env() {
    let dir = TempDir::new().unwrap();
    let runner = write_runner(&dir, "printf '%s@%s\\n' \"$SPOOL_PROJECT\" \"$SPOOL_EGG_VERSION\"");
    let enumerator = CommandEnumerator::new(runner, dir.path());

    let spiders = enumerator.enumerate("quotesbot", Some("r1")).unwrap();
    assert_eq!(spiders, vec!["quotesbot@r1"]);
}

#[test]
fn nonzero_exit_is_runner_failure_with_diagnostics() {
    let dir = TempDir::new().unwrap();
    let runner = write_runner(&dir, "echo 'Exception: settings broke' >&2; exit 1");
    let enumerator = CommandEnumerator::new(runner, dir.path());

    let err = enumerator.enumerate("p1", None).unwrap_err();
    match err {
        EngineError::RunnerFailed(diag) => assert!(diag.contains("Exception: settings broke")),
        other => panic!("expected RunnerFailed, got {other:?}"),
    }
}

#[test]
fn missing_runner_binary_is_runner_failure() {
    let dir = TempDir::new().unwrap();
    let enumerator = CommandEnumerator::new("/nonexistent/runner", dir.path());
    assert!(matches!(
        enumerator.enumerate("p1", None),
        Err(EngineError::RunnerFailed(_))
    ));
}
