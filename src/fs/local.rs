use anyhow::{Context, Result};
use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fs::backend::{FileStat, RemoteFs};
use crate::fs::types::FileEntry;

pub struct LocalFs;

impl LocalFs {
    /// List a directory: directories first, then case-insensitive name order.
    ///
    /// The order is deterministic so a replication run always visits the
    /// same tree in the same sequence. Dotfiles are included.
    pub fn list_dir(path: &Path) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        let read_dir = fs::read_dir(path)
            .with_context(|| format!("Failed to read directory: {}", path.display()))?;

        for entry in read_dir {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().to_string();

            let modified = metadata.modified().ok().and_then(|t| {
                DateTime::from_timestamp(
                    t.duration_since(std::time::UNIX_EPOCH).ok()?.as_secs() as i64,
                    0,
                )
            });

            entries.push(FileEntry {
                name,
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                modified,
            });
        }

        // Sort: directories first, then by name
        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });

        Ok(entries)
    }
}

/// A local directory exposed through the remote interface.
///
/// Remote paths are resolved beneath `root`, so an absolute remote path like
/// `/dst/app` lands at `<root>/dst/app`. Used by the test suite and for
/// deploying to a locally mounted target.
pub struct LocalDir {
    root: PathBuf,
}

impl LocalDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl RemoteFs for LocalDir {
    async fn stat(&self, path: &str) -> Result<Option<FileStat>> {
        match tokio::fs::metadata(self.full_path(path)).await {
            Ok(metadata) => {
                let modified = metadata.modified().ok().and_then(|t| {
                    DateTime::from_timestamp(
                        t.duration_since(std::time::UNIX_EPOCH).ok()?.as_secs() as i64,
                        0,
                    )
                });
                Ok(Some(FileStat {
                    size: metadata.len(),
                    is_dir: metadata.is_dir(),
                    modified,
                }))
            }
            Err(_) => Ok(None),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<()> {
        tokio::fs::create_dir(self.full_path(path))
            .await
            .with_context(|| format!("Failed to create directory: {}", path))?;
        Ok(())
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path))
            .await
            .with_context(|| format!("Failed to read file: {}", path))?;
        Ok(data)
    }

    async fn write_bytes(&self, path: &str, data: Vec<u8>) -> Result<()> {
        tokio::fs::write(self.full_path(path), data)
            .await
            .with_context(|| format!("Failed to write file: {}", path))?;
        Ok(())
    }
}
