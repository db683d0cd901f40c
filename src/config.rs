//! Configuration for plsync.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (API_KEY, CHANNEL_ID, ROOT_MUSIC_PATH,
//!    MAX_PLAYLIST_RESULT, MAX_PLAYLIST_ITEMS_RESULT, PLSYNC_DOWNLOADER),
//!    including those loaded from a `.env` file
//! 2. Config file (.plsync/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .plsync/config.yaml
//! - Relative paths in the config file are resolved against the directory
//!   containing `.plsync/`

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::adapters::youtube::YouTubeConfig;
use crate::adapters::youtube_dl::{DEFAULT_AUDIO_QUALITY, DEFAULT_BINARY};
use crate::core::safety::SafetyLimits;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub youtube: YouTubeSection,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub downloader: DownloaderSection,
    #[serde(default)]
    pub safety: Option<SafetyLimits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouTubeSection {
    pub api_key: Option<String>,
    pub channel_id: Option<String>,
    pub max_playlist_results: Option<u32>,
    pub max_playlist_items_results: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Root holding one directory per playlist (relative to project root)
    pub root: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloaderSection {
    pub binary: Option<String>,
    pub audio_quality: Option<String>,
}

/// Downloader settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderSettings {
    pub binary: String,
    pub audio_quality: String,
}

impl Default for DownloaderSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            audio_quality: DEFAULT_AUDIO_QUALITY.to_string(),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// YouTube Data API key
    pub api_key: Option<String>,
    /// Channel whose playlists are synced
    pub channel_id: Option<String>,
    /// Root directory holding one directory per playlist
    pub root: Option<PathBuf>,
    pub max_playlist_results: u32,
    pub max_playlist_items_results: u32,
    pub downloader: DownloaderSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Safety settings
    pub safety: SafetyLimits,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: None,
            root: None,
            max_playlist_results: DEFAULT_PAGE_SIZE,
            max_playlist_items_results: DEFAULT_PAGE_SIZE,
            downloader: DownloaderSettings::default(),
            config_file: None,
            safety: SafetyLimits::default(),
        }
    }
}

impl ResolvedConfig {
    /// YouTube client settings; fails without an API key
    pub fn youtube(&self) -> Result<YouTubeConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("No YouTube API key configured (set API_KEY)")?;

        Ok(YouTubeConfig {
            api_key,
            max_playlist_results: self.max_playlist_results,
            max_playlist_items_results: self.max_playlist_items_results,
        })
    }
}

/// Load a `.env` from the working directory, falling back to ~/.plsync/.env
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(_) => return,
        Err(e) if e.not_found() => {}
        Err(e) => {
            warn!(error = %e, "Ignoring malformed .env in working directory");
            return;
        }
    }

    if let Some(path) = dirs::home_dir().map(|h| h.join(".plsync").join(".env")) {
        load_env_file(&path);
    }
}

/// Load one env file if it exists; returns whether it was applied
fn load_env_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    match dotenvy::from_path(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed env file");
            false
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".plsync").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Parse a numeric environment override
fn env_u32(name: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Option<u32>> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a positive integer, got '{}'", name, raw)),
        None => Ok(None),
    }
}

/// Merge file settings and environment into a resolved config
fn resolve(
    file: Option<(&Path, ConfigFile)>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let (config_file, file) = match file {
        Some((path, parsed)) => (Some(path.to_path_buf()), parsed),
        None => (None, ConfigFile::default()),
    };

    // Base directory is the parent of .plsync/ (grandparent of config.yaml)
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));

    let root = match lookup("ROOT_MUSIC_PATH") {
        Some(env_root) => Some(PathBuf::from(env_root)),
        None => file.paths.root.as_deref().map(|r| resolve_path(base_dir, r)),
    };

    let max_playlist_results = env_u32("MAX_PLAYLIST_RESULT", lookup)?
        .or(file.youtube.max_playlist_results)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let max_playlist_items_results = env_u32("MAX_PLAYLIST_ITEMS_RESULT", lookup)?
        .or(file.youtube.max_playlist_items_results)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let defaults = DownloaderSettings::default();
    let downloader = DownloaderSettings {
        binary: lookup("PLSYNC_DOWNLOADER")
            .or(file.downloader.binary)
            .unwrap_or(defaults.binary),
        audio_quality: file.downloader.audio_quality.unwrap_or(defaults.audio_quality),
    };

    Ok(ResolvedConfig {
        api_key: lookup("API_KEY").or(file.youtube.api_key),
        channel_id: lookup("CHANNEL_ID").or(file.youtube.channel_id),
        root,
        max_playlist_results,
        max_playlist_items_results,
        downloader,
        config_file,
        safety: file.safety.unwrap_or_default(),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let env_lookup = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

    match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            resolve(Some((&path, parsed)), &env_lookup)
        }
        None => resolve(None, &env_lookup),
    }
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
