//! Reconciliation Integration Tests
//!
//! Queue properties over the public API: scenarios, disjointness,
//! idempotence and ambiguity safety.

use std::collections::HashSet;
use std::path::Path;

use plsync::core::codec;
use plsync::core::scanner::inventory_from_names;
use plsync::domain::{CatalogEntry, CatalogSnapshot, Collection, LocalInventory};
use plsync::reconcile;

fn catalog(entries: &[(&str, &str)]) -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::new(&Collection::new("PL1", "Road Trip"));
    snapshot.extend_page(
        entries
            .iter()
            .map(|(id, title)| CatalogEntry::new(*id, *title))
            .collect(),
    );
    snapshot
}

fn inventory(names: &[&str]) -> LocalInventory {
    inventory_from_names(Path::new("/music/Road Trip"), names.iter().copied())
}

#[test]
fn test_scenario_already_in_sync() {
    let result = reconcile(
        &inventory(&["Song One-abc12345678.mp3"]),
        &catalog(&[("abc12345678", "Song One")]),
    );
    assert!(result.to_download.is_empty());
    assert!(result.to_delete.is_empty());
}

#[test]
fn test_scenario_empty_catalog() {
    let result = reconcile(&inventory(&["Old Song-xyz98765432.mp3"]), &catalog(&[]));
    assert_eq!(result.to_delete, vec!["Old Song-xyz98765432.mp3"]);
    assert!(result.to_download.is_empty());
}

#[test]
fn test_scenario_empty_directory() {
    let result = reconcile(&inventory(&[]), &catalog(&[("new00000001", "New Song")]));
    assert_eq!(
        result.to_download,
        vec![CatalogEntry::new("new00000001", "New Song")]
    );
    assert!(result.to_delete.is_empty());
}

#[test]
fn test_queues_are_disjoint_in_identifier_space() {
    let local = inventory(&[
        "Keep-kep00000001.mp3",
        "Drop-drp00000001.mp3",
        "Dup A-dup00000001.mp3",
        "Dup B-dup00000001.mp3",
        "short.mp3",
        "readme.txt",
    ]);
    let remote = catalog(&[
        ("kep00000001", "Keep"),
        ("new00000001", "New"),
        ("new00000002", "Newer"),
    ]);

    let result = reconcile(&local, &remote);

    let download_ids: HashSet<&str> = result.to_download.iter().map(|e| e.id.as_str()).collect();
    let delete_ids: HashSet<&str> = result
        .to_delete
        .iter()
        .filter_map(|name| codec::decode(name))
        .collect();

    assert!(download_ids.is_disjoint(&delete_ids));
    assert_eq!(download_ids, HashSet::from(["new00000001", "new00000002"]));
    assert_eq!(delete_ids, HashSet::from(["drp00000001"]));
}

#[test]
fn test_reconcile_is_idempotent() {
    let local = inventory(&["Keep-kep00000001.mp3", "Drop-drp00000001.mp3"]);
    let remote = catalog(&[("kep00000001", "Keep"), ("new00000001", "New")]);

    let first = reconcile(&local, &remote);
    let second = reconcile(&local, &remote);
    assert_eq!(first, second);
}

#[test]
fn test_applied_plan_reconciles_to_nothing() {
    let remote = catalog(&[("kep00000001", "Keep"), ("new00000001", "New")]);
    let first = reconcile(
        &inventory(&["Keep-kep00000001.mp3", "Drop-drp00000001.mp3"]),
        &remote,
    );

    // Apply the plan by hand: drop deletes, add downloads
    let mut names: Vec<String> = vec!["Keep-kep00000001.mp3".to_string(), "Drop-drp00000001.mp3".to_string()];
    names.retain(|n| !first.to_delete.contains(n));
    names.extend(
        first
            .to_download
            .iter()
            .map(|e| codec::encode(&e.display_title, &e.id, codec::EXTENSION)),
    );

    let after = inventory_from_names(Path::new("/music/Road Trip"), names);
    assert!(reconcile(&after, &remote).is_in_sync());
}

#[test]
fn test_ambiguous_identifier_is_never_deleted() {
    let result = reconcile(
        &inventory(&["Take 1-amb00000001.mp3", "Take 2-amb00000001.mp3"]),
        &catalog(&[]),
    );

    assert!(result.to_delete.is_empty());
    assert_eq!(result.ambiguous.len(), 1);
    assert_eq!(
        result.ambiguous[0].file_names,
        vec!["Take 1-amb00000001.mp3", "Take 2-amb00000001.mp3"]
    );
}

#[test]
fn test_encode_decode_round_trip_for_titles_with_separators() {
    for title in ["Artist - Song", "a-b", "", "Ça va - Live ♫"] {
        let name = codec::encode(title, "nL_wHlldFns", codec::EXTENSION);
        assert_eq!(codec::decode(&name), Some("nL_wHlldFns"));
    }
}
