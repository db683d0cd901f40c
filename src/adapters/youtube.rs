//! YouTube Data API v3 adapter.
//!
//! Channels own playlists (collections), playlists own playlist items
//! (catalog entries). Only API-key authentication is supported.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CatalogSource;
use crate::core::fetcher::PageCursor;
use crate::domain::{CatalogEntry, CatalogPage, Collection};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Configuration for the YouTube client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: String,

    /// Page size for playlist listings
    pub max_playlist_results: u32,

    /// Page size for playlist item listings
    pub max_playlist_items_results: u32,
}

/// YouTube Data API client
pub struct YouTubeClient {
    config: YouTubeConfig,
    base_url: String,
    client: reqwest::Client,
}

/// Paged list response shared by `playlists` and `playlistItems`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

/// Error body returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl YouTubeClient {
    /// Create a new YouTube client
    pub fn new(config: YouTubeConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client against a different API root
    pub fn with_base_url(config: YouTubeConfig, base_url: impl Into<String>) -> Self {
        Self {
            config,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL
    fn api_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// Issue a GET and decode the JSON body, surfacing API error messages
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.api_url(resource);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send YouTube {} request", resource))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            anyhow::bail!("YouTube API error ({}): {}", status, message.trim());
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse YouTube {} response", resource))
    }

    async fn playlists_page(
        &self,
        filter: (&str, &str),
        page_token: Option<&str>,
    ) -> Result<ListResponse<PlaylistResource>> {
        let mut query = vec![
            ("part", "snippet".to_string()),
            (filter.0, filter.1.to_string()),
            ("maxResults", self.config.max_playlist_results.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        self.get("playlists", &query).await
    }
}

impl From<PlaylistResource> for Collection {
    fn from(p: PlaylistResource) -> Self {
        Collection::new(p.id, p.snippet.title)
    }
}

#[async_trait]
impl CatalogSource for YouTubeClient {
    async fn list_collections(&self, parent_id: &str) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        let mut cursor = PageCursor::new();

        loop {
            let page = self
                .playlists_page(("channelId", parent_id), cursor.token())
                .await
                .with_context(|| format!("Cannot list playlists of channel '{}'", parent_id))?;

            collections.extend(page.items.into_iter().map(Collection::from));

            match cursor.advance(page.next_page_token) {
                Ok(true) => {}
                Ok(false) => break,
                Err(token) => anyhow::bail!(
                    "Playlist listing of channel '{}' did not advance, token '{}' repeated",
                    parent_id,
                    token
                ),
            }
        }

        debug!(channel = parent_id, count = collections.len(), "Listed playlists");
        Ok(collections)
    }

    async fn find_collection(&self, collection_id: &str) -> Result<Option<Collection>> {
        let page = self
            .playlists_page(("id", collection_id), None)
            .await
            .with_context(|| format!("Cannot look up playlist '{}'", collection_id))?;

        Ok(page.items.into_iter().next().map(Collection::from))
    }

    async fn fetch_page(
        &self,
        collection_id: &str,
        page_token: Option<&str>,
    ) -> Result<CatalogPage> {
        let mut query = vec![
            ("part", "snippet".to_string()),
            ("playlistId", collection_id.to_string()),
            (
                "maxResults",
                self.config.max_playlist_items_results.to_string(),
            ),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let page: ListResponse<PlaylistItemResource> = self
            .get("playlistItems", &query)
            .await
            .with_context(|| format!("Cannot get items of playlist '{}'", collection_id))?;

        let entries = page
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet;
                snippet
                    .resource_id
                    .video_id
                    .map(|id| CatalogEntry::new(id, snippet.title))
            })
            .collect();

        Ok(CatalogPage::new(entries, page.next_page_token))
    }
}
