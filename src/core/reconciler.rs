//! Reconciliation of a local inventory against a catalog snapshot.
//!
//! Pure and synchronous. Output order follows input order: downloads in
//! catalog order, deletes in inventory order.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    AmbiguousIdentifier, CatalogSnapshot, LocalInventory, ReconciliationResult,
};

/// Compute the download and delete queues.
///
/// - A catalog entry is downloaded when no local file decodes to its id.
///   Repeated catalog ids are queued once.
/// - A local file is deleted when its id is absent from the catalog and it
///   is the only file carrying that id. Ids held by several files are
///   reported as ambiguous and none of those files are deleted.
/// - Files without a decoded id are ignored.
pub fn reconcile(inventory: &LocalInventory, catalog: &CatalogSnapshot) -> ReconciliationResult {
    let catalog_ids = catalog.ids();

    let mut local: HashMap<&str, Vec<&str>> = HashMap::new();
    for (id, file_name) in inventory.identified() {
        local.entry(id).or_default().push(file_name);
    }

    let mut queued = HashSet::new();
    let to_download = catalog
        .entries
        .iter()
        .filter(|e| !local.contains_key(e.id.as_str()))
        .filter(|e| queued.insert(e.id.as_str()))
        .cloned()
        .collect();

    let mut to_delete = Vec::new();
    let mut ambiguous = Vec::new();
    let mut reported = HashSet::new();

    for (id, file_name) in inventory.identified() {
        if catalog_ids.contains(id) {
            continue;
        }
        match local.get(id).map(Vec::as_slice) {
            Some([_]) => to_delete.push(file_name.to_string()),
            Some(files) if reported.insert(id) => ambiguous.push(AmbiguousIdentifier {
                id: id.to_string(),
                file_names: files.iter().map(|f| f.to_string()).collect(),
            }),
            _ => {}
        }
    }

    ReconciliationResult {
        to_download,
        to_delete,
        ambiguous,
    }
}
