//! Safety limits for sync pipelines.
//!
//! Guards destructive work through configurable limits on:
//! - Directory/catalog name similarity
//! - Pipeline and per-download timeouts
//! - Number of pipelines running at once

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Safety limits for sync pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Minimum directory/catalog name similarity, 0.0 to 1.0 (default: 0.5)
    #[serde(default = "default_min_similarity")]
    pub min_directory_similarity: f64,

    /// Total pipeline timeout in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_pipeline_timeout")]
    pub pipeline_timeout_seconds: u64,

    /// Timeout for a single download in seconds (default: 900 = 15 min)
    #[serde(default = "default_download_timeout")]
    pub download_timeout_seconds: u64,

    /// Pipelines allowed to run concurrently (default: 4)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_pipelines: usize,
}

fn default_min_similarity() -> f64 {
    0.5
}
fn default_pipeline_timeout() -> u64 {
    3600
} // 1 hour
fn default_download_timeout() -> u64 {
    900
} // 15 min
fn default_max_concurrent() -> usize {
    4
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            min_directory_similarity: default_min_similarity(),
            pipeline_timeout_seconds: default_pipeline_timeout(),
            download_timeout_seconds: default_download_timeout(),
            max_concurrent_pipelines: default_max_concurrent(),
        }
    }
}

impl SafetyLimits {
    pub fn pipeline_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline_timeout_seconds)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_seconds)
    }

    /// Concurrency bound, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_pipelines.max(1)
    }

    /// Check a similarity score against the floor
    pub fn check_similarity(
        &self,
        directory: &str,
        catalog_title: &str,
        score: f64,
    ) -> Result<(), SafetyViolation> {
        if score < self.min_directory_similarity {
            return Err(SafetyViolation::DirectoryMismatch {
                directory: directory.to_string(),
                catalog_title: catalog_title.to_string(),
                score,
                threshold: self.min_directory_similarity,
            });
        }
        Ok(())
    }
}

/// Safety violation errors
#[derive(Debug, Clone, Error)]
pub enum SafetyViolation {
    #[error(
        "Directory '{directory}' does not look like catalog '{catalog_title}' \
         (similarity {score:.2} < {threshold:.2})"
    )]
    DirectoryMismatch {
        directory: String,
        catalog_title: String,
        score: f64,
        threshold: f64,
    },

    #[error("Pipeline timeout: {limit_seconds}s elapsed during {stage}")]
    PipelineTimeout {
        stage: &'static str,
        limit_seconds: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = SafetyLimits::default();
        assert_eq!(limits.min_directory_similarity, 0.5);
        assert_eq!(limits.pipeline_timeout(), Duration::from_secs(3600));
        assert_eq!(limits.download_timeout(), Duration::from_secs(900));
        assert_eq!(limits.max_concurrent_pipelines, 4);
    }

    #[test]
    fn test_similarity_floor() {
        let limits = SafetyLimits::default();

        assert!(limits.check_similarity("Mix", "Mix", 1.0).is_ok());
        assert!(limits.check_similarity("Mix", "Mox", 0.5).is_ok());

        let result = limits.check_similarity("Mix", "Other", 0.49);
        assert!(matches!(
            result,
            Err(SafetyViolation::DirectoryMismatch { .. })
        ));
    }

    #[test]
    fn test_concurrency_never_zero() {
        let limits = SafetyLimits {
            max_concurrent_pipelines: 0,
            ..Default::default()
        };
        assert_eq!(limits.concurrency(), 1);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let limits: SafetyLimits = serde_yaml::from_str("pipeline_timeout_seconds: 60").unwrap();
        assert_eq!(limits.pipeline_timeout_seconds, 60);
        assert_eq!(limits.min_directory_similarity, 0.5);
    }
}
