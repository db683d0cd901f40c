//! Paginated catalog accumulation.
//!
//! Requests pages until one comes back without a next-page token. Entries
//! are appended in arrival order with no de-duplication at this layer.

use std::collections::HashSet;

use tracing::debug;

use super::error::SyncError;
use crate::adapters::CatalogSource;
use crate::domain::{CatalogSnapshot, Collection};

/// Position in a paged listing.
///
/// Remembers every token requested so far, so a listing whose tokens cycle
/// is caught instead of being followed forever.
#[derive(Debug, Default)]
pub struct PageCursor {
    current: Option<String>,
    seen: HashSet<String>,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for the next request; `None` for the first page
    pub fn token(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Move past the page just received.
    ///
    /// Returns `Ok(false)` when the listing is complete and `Err(token)` when
    /// `next` was already requested.
    pub fn advance(&mut self, next: Option<String>) -> Result<bool, String> {
        match next {
            None => Ok(false),
            Some(next) if !self.seen.insert(next.clone()) => Err(next),
            Some(next) => {
                self.current = Some(next);
                Ok(true)
            }
        }
    }
}

/// Fetch every page of `collection` into a snapshot
pub async fn accumulate_catalog(
    source: &dyn CatalogSource,
    collection: &Collection,
) -> Result<CatalogSnapshot, SyncError> {
    let mut snapshot = CatalogSnapshot::new(collection);
    let mut cursor = PageCursor::new();
    let mut pages = 0usize;

    loop {
        let page = source
            .fetch_page(&collection.id, cursor.token())
            .await
            .map_err(|e| SyncError::fetch(&collection.id, e))?;
        pages += 1;

        debug!(
            collection = %collection.id,
            page = pages,
            entries = page.entries.len(),
            "Fetched catalog page"
        );
        snapshot.extend_page(page.entries);

        match cursor.advance(page.next_page_token) {
            Ok(true) => {}
            Ok(false) => break,
            Err(token) => {
                return Err(SyncError::Fetch {
                    collection_id: collection.id.clone(),
                    message: format!("pagination did not advance, token '{}' repeated", token),
                });
            }
        }
    }

    Ok(snapshot)
}
