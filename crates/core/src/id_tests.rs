// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

#[test]
fn generated_ids_are_prefixed_and_unique() {
    let a = JobId::generate();
    let b = JobId::generate();
    assert!(a.as_str().starts_with(JobId::PREFIX));
    assert_eq!(a.as_str().len(), 23);
    assert_ne!(a, b);
}

#[test]
fn caller_supplied_id_passes_through() {
    let id = JobId::from_string("2024-09-01T12_00_00");
    assert_eq!(id.as_str(), "2024-09-01T12_00_00");
    assert_eq!(id.to_string(), "2024-09-01T12_00_00");
}

#[test]
fn hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(JobId::from_string("j1"), 42);
    assert_eq!(map.get("j1"), Some(&42));
}

#[test]
fn serde_is_transparent() {
    let id = JobId::from_string("my-job");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-job\"");

    let parsed: JobId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}
