//! Core sync engine.
//!
//! This module contains:
//! - Codec: identifiers embedded in file names
//! - Scanner: local inventory of a target directory
//! - Validator: directory/catalog name matching
//! - Fetcher: paginated catalog accumulation
//! - Reconciler: download and delete queues
//! - Executor: queue dispatch to collaborators
//! - Orchestrator: pipelines and their scheduling

pub mod codec;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod orchestrator;
pub mod reconciler;
pub mod safety;
pub mod scanner;
pub mod validator;

// Re-export commonly used types
pub use error::{DeleteError, SyncError};
pub use executor::{ActionExecutor, ExecutionOutcome};
pub use fetcher::{accumulate_catalog, PageCursor};
pub use orchestrator::{Orchestrator, SyncJob, SyncOptions};
pub use reconciler::reconcile;
pub use safety::{SafetyLimits, SafetyViolation};
