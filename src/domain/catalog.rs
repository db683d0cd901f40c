//! Remote catalog types.
//!
//! A catalog is one remote ordered collection (a playlist). Entries are
//! accumulated page by page into a [`CatalogSnapshot`] that lives for a
//! single reconciliation pass.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A remote collection as listed under its parent (channel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Remote collection id (playlist id)
    pub id: String,

    /// Display title of the collection
    pub title: String,
}

impl Collection {
    /// Create a new collection reference
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One unit of remote content (a video)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique key of the content within the remote catalog
    pub id: String,

    /// Human-readable title
    pub display_title: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, display_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_title: display_title.into(),
        }
    }
}

/// A single page returned by the remote catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    /// Entries on this page, in remote order
    pub entries: Vec<CatalogEntry>,

    /// Token for the next page, `None` on the last page
    pub next_page_token: Option<String>,
}

impl CatalogPage {
    pub fn new(entries: Vec<CatalogEntry>, next_page_token: Option<String>) -> Self {
        Self {
            entries,
            next_page_token,
        }
    }

    /// A terminal page with the given entries
    pub fn last(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries, None)
    }
}

/// Full contents of one collection, accumulated across pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub collection_id: String,
    pub collection_title: String,

    /// Entries in page-arrival order. Duplicates are kept here and
    /// collapsed by the reconciler.
    pub entries: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    /// Start an empty snapshot for a collection
    pub fn new(collection: &Collection) -> Self {
        Self {
            collection_id: collection.id.clone(),
            collection_title: collection.title.clone(),
            entries: Vec::new(),
        }
    }

    /// Append one page worth of entries
    pub fn extend_page(&mut self, entries: Vec<CatalogEntry>) {
        self.entries.extend(entries);
    }

    /// Set of distinct entry ids
    pub fn ids(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
