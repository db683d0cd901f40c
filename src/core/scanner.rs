//! Local inventory scanning.
//!
//! Lists a target directory (no recursion), keeps files with the managed
//! extension and decodes their embedded identifiers.

use std::path::Path;

use tracing::debug;

use super::codec;
use super::error::SyncError;
use crate::adapters::Filesystem;
use crate::domain::{LocalFile, LocalInventory};

/// Build an inventory from raw directory entry names
pub fn inventory_from_names<I, S>(directory: &Path, names: I) -> LocalInventory
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let files = names
        .into_iter()
        .map(Into::into)
        .filter(|name| codec::has_managed_extension(name))
        .map(|name| {
            let embedded_id = codec::decode(&name).map(str::to_string);
            LocalFile::new(name, embedded_id)
        })
        .collect();

    LocalInventory::new(directory, files)
}

/// Scan `directory` through the filesystem collaborator.
///
/// A listing failure is returned as [`SyncError::DirectoryUnreadable`]; the
/// caller must not act on the directory after that.
pub async fn scan(fs: &dyn Filesystem, directory: &Path) -> Result<LocalInventory, SyncError> {
    let names = fs.list_files(directory).await?;
    let inventory = inventory_from_names(directory, names);

    debug!(
        directory = %directory.display(),
        files = inventory.len(),
        unidentified = inventory.files.iter().filter(|f| f.embedded_id.is_none()).count(),
        "Scanned directory"
    );

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalFilesystem;
    use tempfile::TempDir;

    #[test]
    fn test_inventory_filters_extension_and_decodes() {
        let inventory = inventory_from_names(
            Path::new("/music/Mix"),
            [
                "Song One-abc12345678.mp3",
                "cover.jpg",
                "x.mp3",
                "Song Two-def12345678.mp3.part",
            ],
        );

        assert_eq!(
            inventory.files,
            vec![
                LocalFile::new("Song One-abc12345678.mp3", Some("abc12345678".to_string())),
                LocalFile::new("x.mp3", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_real_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Song One-abc12345678.mp3"), b"").unwrap();
        std::fs::write(temp.path().join("notes.txt"), b"").unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("Deep-zzz12345678.mp3"), b"").unwrap();

        let inventory = scan(&LocalFilesystem, temp.path()).await.unwrap();

        assert_eq!(inventory.len(), 1);
        assert_eq!(
            inventory.files[0].embedded_id.as_deref(),
            Some("abc12345678")
        );
    }

    #[tokio::test]
    async fn test_scan_unreadable_directory() {
        let temp = TempDir::new().unwrap();
        let result = scan(&LocalFilesystem, &temp.path().join("missing")).await;
        assert!(matches!(result, Err(SyncError::DirectoryUnreadable { .. })));
    }
}
