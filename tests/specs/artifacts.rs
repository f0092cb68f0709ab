//! Artifact management specs: versioned storage, natural ordering,
//! sanitized names, and the uniform not-found shape for traversal input.

use crate::prelude::*;

#[test]
fn versions_accumulate_in_natural_order() {
    let h = Harness::new();

    let spiders = h.engine.add_version("quotes", "r1", b"egg-1").unwrap();
    assert_eq!(spiders, 2);
    h.engine.add_version("quotes", "r10", b"egg-10").unwrap();
    h.engine.add_version("quotes", "r9", b"egg-9").unwrap();

    // r9 < r10 numerically, whatever the insertion order.
    assert_eq!(h.engine.list_versions("quotes").unwrap(), vec!["r1", "r9", "r10"]);

    let (latest, data) = h.store.get("quotes", None).unwrap().unwrap();
    assert_eq!(latest, "r10");
    assert_eq!(data, b"egg-10");
}

#[test]
fn version_names_are_sanitized_for_storage() {
    let h = Harness::new();
    h.engine.add_version("quotes", "0.1", b"egg").unwrap();
    assert_eq!(h.engine.list_versions("quotes").unwrap(), vec!["0_1"]);

    // The original spelling still resolves to the stored artifact.
    assert!(h.store.get("quotes", Some("0.1")).unwrap().is_some());
}

#[test]
fn deleting_the_last_version_removes_the_project_everywhere() {
    let h = Harness::new();
    h.engine.add_version("quotes", "r1", b"egg").unwrap();
    h.schedule("quotes", "alpha", "j1");

    h.engine.delete_version("quotes", "r1").unwrap();

    assert!(h.engine.list_projects().unwrap().is_empty());
    assert!(h.engine.list_versions("quotes").unwrap().is_empty());
    assert_eq!(h.engine.daemon_status().pending, 0);
    let err = h.engine.schedule(JobSpec::builder().project("quotes").build()).unwrap_err();
    assert_eq!(err.to_string(), "project 'quotes' not found");
}

#[test]
fn delete_project_takes_every_version_and_pending_job() {
    let h = Harness::new();
    h.engine.add_version("quotes", "r1", b"egg").unwrap();
    h.engine.add_version("quotes", "r2", b"egg").unwrap();
    h.engine.add_version("books", "r1", b"egg").unwrap();
    h.schedule("quotes", "alpha", "j1");

    h.engine.delete_project("quotes").unwrap();

    assert_eq!(h.engine.list_projects().unwrap(), vec!["books"]);
    assert_eq!(h.engine.daemon_status().pending, 0);
}

#[test]
fn traversal_input_reads_as_plain_not_found() {
    let h = Harness::new();
    h.put("quotes", "r1");

    let err = h.engine.list_spiders("../secrets", None).unwrap_err();
    assert_eq!(err.to_string(), "project '../secrets' not found");

    let err = h.engine.delete_project("..\\evil").unwrap_err();
    assert_eq!(err.to_string(), "project '..\\evil' not found");

    let err = h
        .engine
        .schedule(JobSpec::builder().project("quotes").spider("../evil").build())
        .unwrap_err();
    assert_eq!(err.to_string(), "spider '../evil' not found");

    // A traversal job id must be refused before any log path is built
    // from it.
    let err = h
        .engine
        .schedule(
            JobSpec::builder()
                .project("quotes")
                .spider("alpha")
                .job_id("../../../../tmp/evil")
                .build(),
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "job '../../../../tmp/evil' not found");
    assert_eq!(h.engine.daemon_status().pending, 0);

    // Nothing was created or deleted along the way.
    assert_eq!(h.engine.list_projects().unwrap(), vec!["quotes"]);
}

#[test]
fn stale_spider_cache_refreshes_only_on_explicit_eviction() {
    let h = Harness::new();
    h.put("quotes", "r1");

    // Prime the cache, then change what enumeration would report.
    assert_eq!(h.engine.list_spiders("quotes", None).unwrap(), vec!["alpha", "beta"]);
    h.spiders.set(&["alpha", "beta", "gamma"]);
    h.put("quotes", "r2");

    // Still the cached list, even for a different version.
    assert_eq!(h.engine.list_spiders("quotes", Some("r2")).unwrap(), vec!["alpha", "beta"]);

    // add_version evicts, so the next lookup recomputes.
    assert_eq!(h.engine.add_version("quotes", "r3", b"egg").unwrap(), 3);
    assert_eq!(
        h.engine.list_spiders("quotes", None).unwrap(),
        vec!["alpha", "beta", "gamma"]
    );
}
