//! Local directory inventory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A managed file found in a target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    /// File name without directory
    pub file_name: String,

    /// Identifier decoded from the file name, `None` when the name is too
    /// short to carry one. Such files are never deleted and never match.
    pub embedded_id: Option<String>,
}

impl LocalFile {
    pub fn new(file_name: impl Into<String>, embedded_id: Option<String>) -> Self {
        Self {
            file_name: file_name.into(),
            embedded_id,
        }
    }
}

/// Files present in one target directory, rebuilt on every run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalInventory {
    pub directory: PathBuf,
    pub files: Vec<LocalFile>,
}

impl LocalInventory {
    pub fn new(directory: impl Into<PathBuf>, files: Vec<LocalFile>) -> Self {
        Self {
            directory: directory.into(),
            files,
        }
    }

    /// Inventory of a directory that does not exist yet
    pub fn empty(directory: &Path) -> Self {
        Self::new(directory, Vec::new())
    }

    /// Files that carry a decoded identifier
    pub fn identified(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().filter_map(|f| {
            f.embedded_id
                .as_deref()
                .map(|id| (id, f.file_name.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
