//! youtube-dl adapter for audio downloads.
//!
//! Runs the downloader as a subprocess with an argument vector, extracting
//! audio to mp3. Works with `youtube-dl` and with `yt-dlp`, which accepts the
//! same flags.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::Downloader;
use crate::core::codec;

/// Default downloader binary
pub const DEFAULT_BINARY: &str = "youtube-dl";

/// Default `--audio-quality` value (best VBR)
pub const DEFAULT_AUDIO_QUALITY: &str = "0";

/// Downloader using the youtube-dl command line tool
pub struct YoutubeDlDownloader {
    /// Path to the binary (default: "youtube-dl")
    binary_path: String,

    /// Value for `--audio-quality`
    audio_quality: String,
}

impl Default for YoutubeDlDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl YoutubeDlDownloader {
    pub fn new() -> Self {
        Self::with_binary_path(DEFAULT_BINARY)
    }

    /// Create a downloader with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            audio_quality: DEFAULT_AUDIO_QUALITY.to_string(),
        }
    }

    /// Override the audio quality
    pub fn with_audio_quality(mut self, audio_quality: impl Into<String>) -> Self {
        self.audio_quality = audio_quality.into();
        self
    }

    /// Watch URL for a video id
    pub fn source_url(source_id: &str) -> String {
        format!("http://www.youtube.com/watch?v={}", source_id)
    }

    /// Arguments passed to the binary for one download
    fn args(&self, source_id: &str, destination_template: &Path) -> Vec<OsString> {
        vec![
            "-o".into(),
            destination_template.as_os_str().to_os_string(),
            "-x".into(),
            "--audio-format".into(),
            codec::EXTENSION.into(),
            "--audio-quality".into(),
            self.audio_quality.as_str().into(),
            Self::source_url(source_id).into(),
        ]
    }
}

#[async_trait]
impl Downloader for YoutubeDlDownloader {
    fn name(&self) -> &str {
        &self.binary_path
    }

    async fn download(
        &self,
        source_id: &str,
        destination_template: &Path,
        download_timeout: Duration,
    ) -> Result<()> {
        let child = Command::new(&self.binary_path)
            .args(self.args(source_id, destination_template))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn {} for '{}'", self.binary_path, source_id))?;

        let output = timeout(download_timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "Download of '{}' timed out after {:?}",
                    source_id, download_timeout
                )
            })?
            .with_context(|| format!("Failed to wait for {} process", self.binary_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "Download of '{}' failed with exit code {}: {}",
                source_id,
                exit_code,
                stderr.trim()
            );
        }

        Ok(())
    }
}
