//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use plsync::adapters::{CatalogSource, Downloader};
use plsync::core::codec;
use plsync::domain::{CatalogEntry, CatalogPage, Collection};

/// In-memory catalog: collections per channel, entries per collection,
/// served in pages of `page_size`
pub struct FakeCatalog {
    pub channels: HashMap<String, Vec<Collection>>,
    pub entries: HashMap<String, Vec<CatalogEntry>>,
    pub page_size: usize,
    pub failing: Vec<String>,
    pub page_delay: Option<Duration>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            entries: HashMap::new(),
            page_size: 2,
            failing: Vec::new(),
            page_delay: None,
        }
    }

    pub fn with_playlist(mut self, channel: &str, id: &str, title: &str, entries: &[(&str, &str)]) -> Self {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .push(Collection::new(id, title));
        self.entries.insert(
            id.to_string(),
            entries
                .iter()
                .map(|(id, title)| CatalogEntry::new(*id, *title))
                .collect(),
        );
        self
    }

    pub fn failing_on(mut self, collection_id: &str) -> Self {
        self.failing.push(collection_id.to_string());
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn list_collections(&self, parent_id: &str) -> Result<Vec<Collection>> {
        self.channels
            .get(parent_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("channel '{}' not found", parent_id))
    }

    async fn find_collection(&self, collection_id: &str) -> Result<Option<Collection>> {
        Ok(self
            .channels
            .values()
            .flatten()
            .find(|c| c.id == collection_id)
            .cloned())
    }

    async fn fetch_page(&self, collection_id: &str, page_token: Option<&str>) -> Result<CatalogPage> {
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|f| f == collection_id) {
            anyhow::bail!("HTTP 500 from playlistItems");
        }

        let entries = self
            .entries
            .get(collection_id)
            .ok_or_else(|| anyhow::anyhow!("playlist '{}' not found", collection_id))?;

        let start: usize = match page_token {
            Some(token) => token.parse()?,
            None => 0,
        };
        let end = (start + self.page_size).min(entries.len());
        let next = (end < entries.len()).then(|| end.to_string());

        Ok(CatalogPage::new(entries[start..end].to_vec(), next))
    }
}

/// Downloader that writes an empty file named the way youtube-dl would
pub struct FakeDownloader {
    pub titles: HashMap<String, String>,
    pub failing: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new(catalog: &FakeCatalog) -> Self {
        Self {
            titles: catalog
                .entries
                .values()
                .flatten()
                .map(|e| (e.id.clone(), e.display_title.clone()))
                .collect(),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    fn name(&self) -> &str {
        "fake"
    }

    async fn download(&self, source_id: &str, destination_template: &Path, _timeout: Duration) -> Result<()> {
        self.calls.lock().unwrap().push(source_id.to_string());
        if self.failing.iter().any(|f| f == source_id) {
            anyhow::bail!("exit code 1: video unavailable");
        }

        // The directory part of the template is %-escaped, as youtube-dl expects
        let directory = destination_template
            .parent()
            .map(|p| PathBuf::from(p.to_string_lossy().replace("%%", "%")))
            .ok_or_else(|| anyhow::anyhow!("template has no directory"))?;
        let title = self.titles.get(source_id).cloned().unwrap_or_default();
        let file_name = codec::encode(&title, source_id, codec::EXTENSION);
        tokio::fs::write(directory.join(file_name), b"").await?;
        Ok(())
    }
}

/// Sorted names of the files in `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

/// Create empty files in `dir`
pub fn touch(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}
