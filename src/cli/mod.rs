//! Command-line interface for plsync.
//!
//! Provides commands for syncing every playlist of a channel, syncing a
//! single playlist into a directory, and showing the resolved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{LocalFilesystem, YouTubeClient, YoutubeDlDownloader};
use crate::config::{self, ResolvedConfig};
use crate::core::{Orchestrator, SyncJob, SyncOptions};
use crate::domain::SyncReport;

pub mod output;

/// plsync - keep local audio directories in sync with YouTube playlists
#[derive(Parser, Debug)]
#[command(name = "plsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync every playlist of a channel into <root>/<playlist title>
    Sync {
        /// Channel id (defaults to CHANNEL_ID)
        #[arg(short, long)]
        channel: Option<String>,

        /// Root directory (defaults to ROOT_MUSIC_PATH)
        #[arg(short, long)]
        root: Option<PathBuf>,

        #[command(flatten)]
        flags: RunFlags,
    },

    /// Sync one playlist into a directory
    Playlist {
        /// Playlist id
        playlist_id: String,

        /// Target directory; its name must resemble the playlist title
        directory: PathBuf,

        #[command(flatten)]
        flags: RunFlags,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Flags shared by sync commands
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RunFlags {
    /// Show what would be deleted and downloaded without doing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunFlags {
    fn options(self) -> SyncOptions {
        SyncOptions {
            dry_run: self.dry_run,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync {
                channel,
                root,
                flags,
            } => sync_channel(channel, root, flags).await,
            Commands::Playlist {
                playlist_id,
                directory,
                flags,
            } => sync_playlist(playlist_id, directory, flags).await,
            Commands::Config => show_config(),
        }
    }
}

/// Wire the production adapters into an orchestrator
fn build_orchestrator(config: &ResolvedConfig) -> Result<Orchestrator> {
    let youtube = YouTubeClient::new(config.youtube()?);
    let downloader = YoutubeDlDownloader::with_binary_path(&config.downloader.binary)
        .with_audio_quality(&config.downloader.audio_quality);

    Ok(Orchestrator::new(
        Arc::new(youtube),
        Arc::new(LocalFilesystem::new()),
        Arc::new(downloader),
        config.safety.clone(),
    ))
}

async fn sync_channel(
    channel: Option<String>,
    root: Option<PathBuf>,
    flags: RunFlags,
) -> Result<()> {
    let config = config::config()?;

    let channel = channel
        .or_else(|| config.channel_id.clone())
        .context("No channel given (pass --channel or set CHANNEL_ID)")?;
    let root = root
        .or_else(|| config.root.clone())
        .context("No root directory given (pass --root or set ROOT_MUSIC_PATH)")?;

    let orchestrator = build_orchestrator(config)?;
    let reports = orchestrator
        .sync_channel(&channel, &root, flags.options())
        .await?;

    finish(&reports, flags)
}

async fn sync_playlist(playlist_id: String, directory: PathBuf, flags: RunFlags) -> Result<()> {
    let config = config::config()?;
    let orchestrator = build_orchestrator(config)?;

    let report = orchestrator
        .run_pipeline(SyncJob::new(playlist_id, directory), flags.options())
        .await;

    finish(&[report], flags)
}

/// Print reports and turn any pipeline or item failure into an error exit
fn finish(reports: &[SyncReport], flags: RunFlags) -> Result<()> {
    if flags.json {
        println!(
            "{}",
            serde_json::to_string_pretty(reports).context("Failed to serialize reports")?
        );
    } else {
        for report in reports {
            print!("{}", output::render_report(report));
        }
        if reports.len() > 1 {
            println!("{}", output::render_totals(reports));
        }
    }

    let with_errors = reports.iter().filter(|r| r.has_errors()).count();
    if with_errors > 0 {
        anyhow::bail!(
            "{} of {} pipeline(s) reported errors",
            with_errors,
            reports.len()
        );
    }

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("plsync configuration");
    println!("====================");
    println!();
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none found, using environment and defaults)"),
    }
    println!(
        "API key:     {}",
        if config.api_key.is_some() { "set" } else { "not set" }
    );
    println!(
        "Channel:     {}",
        config.channel_id.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Root:        {}",
        config
            .root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "Page sizes:  playlists {}, items {}",
        config.max_playlist_results, config.max_playlist_items_results
    );
    println!(
        "Downloader:  {} (audio quality {})",
        config.downloader.binary, config.downloader.audio_quality
    );
    println!();
    println!("Safety:");
    println!(
        "  min directory similarity: {:.2}",
        config.safety.min_directory_similarity
    );
    println!(
        "  pipeline timeout:         {}s",
        config.safety.pipeline_timeout_seconds
    );
    println!(
        "  download timeout:         {}s",
        config.safety.download_timeout_seconds
    );
    println!(
        "  concurrent pipelines:     {}",
        config.safety.max_concurrent_pipelines
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_command() {
        let cli = Cli::try_parse_from([
            "plsync", "sync", "--channel", "UC123", "--root", "/music", "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Sync {
                channel,
                root,
                flags,
            } => {
                assert_eq!(channel.as_deref(), Some("UC123"));
                assert_eq!(root, Some(PathBuf::from("/music")));
                assert!(flags.dry_run);
                assert!(!flags.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_playlist_command() {
        let cli =
            Cli::try_parse_from(["plsync", "playlist", "PL123", "/music/Road Trip", "--json"])
                .unwrap();

        match cli.command {
            Commands::Playlist {
                playlist_id,
                directory,
                flags,
            } => {
                assert_eq!(playlist_id, "PL123");
                assert_eq!(directory, PathBuf::from("/music/Road Trip"));
                assert!(flags.json);
                assert!(!flags.options().dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_playlist_requires_directory() {
        assert!(Cli::try_parse_from(["plsync", "playlist", "PL123"]).is_err());
    }
}
