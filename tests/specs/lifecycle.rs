//! Job lifecycle specs: a scheduled job travels pending → running →
//! finished, visible in exactly one collection at every observation.

use crate::prelude::*;

#[test]
fn job_travels_pending_running_finished() {
    let h = Harness::new();
    h.put("quotes", "r1");

    h.schedule("quotes", "alpha", "j1");
    assert_eq!(h.engine.status(Some("quotes"), "j1").unwrap(), Some(JobState::Pending));

    h.engine.tick_now();
    assert_eq!(h.engine.status(Some("quotes"), "j1").unwrap(), Some(JobState::Running));
    let listing = h.engine.list_jobs(Some("quotes")).unwrap();
    assert!(listing.pending.is_empty());
    assert_eq!(listing.running[0].start_ms, 1_000_000);

    h.clock.advance_ms(250);
    h.finish("j1", 0);

    assert_eq!(h.engine.status(Some("quotes"), "j1").unwrap(), Some(JobState::Finished));
    let listing = h.engine.list_jobs(Some("quotes")).unwrap();
    assert!(listing.pending.is_empty());
    assert!(listing.running.is_empty());
    let entry = &listing.finished[0];
    assert_eq!(entry.id, "j1");
    assert_eq!((entry.start_ms, entry.end_ms), (1_000_000, 1_000_250));
    assert_eq!(entry.log_url, "/logs/quotes/alpha/j1.log");
    assert_eq!(entry.items_url, "/items/quotes/alpha/j1.jl");
}

#[test]
fn duplicate_job_ids_cancel_one_instance_per_call() {
    let h = Harness::new();
    h.put("quotes", "r1");
    h.schedule("quotes", "alpha", "j1");
    h.schedule("quotes", "alpha", "j1");

    // Both pending; one cancel takes one instance.
    assert_eq!(h.engine.cancel("quotes", "j1", None).unwrap(), Some(JobState::Pending));
    assert_eq!(h.engine.daemon_status().pending, 1);

    h.engine.tick_now();
    assert_eq!(h.engine.cancel("quotes", "j1", None).unwrap(), Some(JobState::Running));
    assert_eq!(h.adapter.signaled().len(), 1);

    h.finish("j1", 0);
    assert_eq!(h.engine.cancel("quotes", "j1", None).unwrap(), None);
    assert_eq!(h.engine.status(Some("quotes"), "j1").unwrap(), Some(JobState::Finished));
}

#[test]
fn finished_overflow_spills_to_durable_history() {
    let h = Harness::with_config(|config| EngineConfig { finished_to_keep: 1, ..config });
    h.put("quotes", "r1");
    h.schedule("quotes", "alpha", "j1");
    h.schedule("quotes", "alpha", "j2");

    h.engine.tick_now();
    h.finish("j1", 0);
    h.finish("j2", 0);

    // Both still listed: j2 from memory, j1 merged back from history.
    let finished = h.engine.list_jobs(Some("quotes")).unwrap().finished;
    let ids: Vec<_> = finished.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["j2", "j1"]);

    // The evicted record is durable, one JSON line, fully parseable.
    let text = std::fs::read_to_string(h.dir.path().join("history.jsonl")).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: spool_core::FinishedJob = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record.job_id, "j1");
    assert_eq!(record.exit_code, Some(0));
}

#[test]
fn capacity_is_a_hard_ceiling_across_ticks() {
    let h = Harness::with_config(|config| EngineConfig { max_procs: 2, ..config });
    h.put("quotes", "r1");
    for id in ["a", "b", "c", "d"] {
        h.schedule("quotes", "alpha", id);
    }

    h.engine.tick_now();
    h.engine.tick_now();
    let status = h.engine.daemon_status();
    assert_eq!((status.pending, status.running), (2, 2));

    h.finish("a", 0);
    let status = h.engine.daemon_status();
    assert_eq!((status.pending, status.running, status.finished), (1, 2, 1));
}
