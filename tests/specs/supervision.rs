//! Real-process supervision specs: the scheduling loop drives actual OS
//! processes through the locally-wired engine, end to end.

use crate::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, Instant};

/// A runner that lists two spiders and, in crawl mode, echoes its identity
/// into the log. The "beta" spider exits nonzero to simulate a crash.
const RUNNER_SCRIPT: &str = r#"#!/bin/sh
case "$1" in
  list)
    echo beta
    echo alpha
    ;;
  crawl)
    echo "spider=$SPOOL_SPIDER job=$SPOOL_JOB version=$SPOOL_EGG_VERSION"
    if [ "$SPOOL_SPIDER" = "beta" ]; then
      exit 3
    fi
    ;;
esac
exit 0
"#;

fn write_runner(dir: &std::path::Path) -> String {
    let path = dir.join("runner.sh");
    std::fs::write(&path, RUNNER_SCRIPT).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

async fn wait_for(deadline: Instant, what: &str, mut done: impl FnMut() -> bool) {
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduling_loop_runs_real_processes() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        max_procs: 2,
        poll_interval_ms: 50,
        runner: write_runner(dir.path()),
        logs_dir: dir.path().join("logs"),
        items_dir: dir.path().join("items"),
        eggs_dir: dir.path().join("eggs"),
        history_file: dir.path().join("history.jsonl"),
        ..EngineConfig::default()
    };
    let engine = Arc::new(Engine::local(config));

    // Enumeration runs the script in list mode.
    assert_eq!(engine.add_version("quotes", "r1", b"egg").unwrap(), 2);
    assert_eq!(engine.list_spiders("quotes", None).unwrap(), vec!["alpha", "beta"]);

    engine
        .schedule(JobSpec::builder().project("quotes").spider("alpha").job_id("j-ok").build())
        .unwrap();
    engine
        .schedule(JobSpec::builder().project("quotes").spider("beta").job_id("j-crash").build())
        .unwrap();

    let looped = engine.clone();
    let task = tokio::spawn(async move { looped.run().await });

    let deadline = Instant::now() + Duration::from_secs(10);
    wait_for(deadline, "both jobs to finish", || engine.daemon_status().finished == 2).await;
    task.abort();

    // Both terminations are ordinary finished jobs, crash included.
    assert_eq!(engine.status(Some("quotes"), "j-ok").unwrap(), Some(JobState::Finished));
    assert_eq!(engine.status(Some("quotes"), "j-crash").unwrap(), Some(JobState::Finished));

    let listing = engine.list_jobs(Some("quotes")).unwrap();
    assert!(listing.pending.is_empty());
    assert!(listing.running.is_empty());
    let ok = listing.finished.iter().find(|e| e.id == "j-ok").unwrap();
    assert_eq!(ok.log_url, "/logs/quotes/alpha/j-ok.log");
    assert!(ok.end_ms >= ok.start_ms);

    // stdout went to the per-job log file, env intact.
    let log = std::fs::read_to_string(dir.path().join("logs/quotes/alpha/j-ok.log")).unwrap();
    assert!(log.contains("spider=alpha job=j-ok"), "log was: {log}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_terminates_a_live_process() {
    let dir = TempDir::new().unwrap();
    let sleeper = dir.path().join("runner.sh");
    std::fs::write(
        &sleeper,
        "#!/bin/sh\nif [ \"$1\" = list ]; then echo alpha; exit 0; fi\nsleep 30\n",
    )
    .unwrap();
    std::fs::set_permissions(&sleeper, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = EngineConfig {
        max_procs: 1,
        poll_interval_ms: 50,
        runner: sleeper.to_string_lossy().into_owned(),
        logs_dir: dir.path().join("logs"),
        items_dir: dir.path().join("items"),
        eggs_dir: dir.path().join("eggs"),
        history_file: dir.path().join("history.jsonl"),
        ..EngineConfig::default()
    };
    let engine = Arc::new(Engine::local(config));
    engine.add_version("quotes", "r1", b"egg").unwrap();
    engine
        .schedule(JobSpec::builder().project("quotes").spider("alpha").job_id("j-slow").build())
        .unwrap();

    let looped = engine.clone();
    let task = tokio::spawn(async move { looped.run().await });

    let deadline = Instant::now() + Duration::from_secs(10);
    wait_for(deadline, "job to start", || engine.daemon_status().running == 1).await;

    assert_eq!(
        engine.cancel("quotes", "j-slow", None).unwrap(),
        Some(JobState::Running)
    );
    wait_for(deadline, "job to terminate", || engine.daemon_status().finished == 1).await;
    task.abort();

    assert_eq!(engine.status(Some("quotes"), "j-slow").unwrap(), Some(JobState::Finished));
}
