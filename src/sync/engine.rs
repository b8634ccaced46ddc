//! Replication engine.
//!
//! Walks the local tree depth-first in pre-order and replays it onto the
//! remote: every directory is ensured before anything beneath it, every
//! non-excluded file is uploaded with the run's retry and backup policy.

use colored::Colorize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::fs::backend::RemoteFs;
use crate::fs::local::LocalFs;
use crate::sync::error::SyncError;
use crate::sync::exclude::ExcludePatterns;
use crate::sync::path::{map_remote, relative_local};
use crate::sync::stats::{RunStats, StatsSnapshot};
use crate::sync::transfer::{ensure_dir, Uploader};

/// The immutable unit of work driving one replication run.
#[derive(Debug, Clone)]
pub struct SyncTask {
    pub local_root: PathBuf,
    pub remote_root: String,
    pub exclude_patterns: Vec<String>,
    pub max_retries: u32,
    pub backup: bool,
    pub backup_suffix: String,
}

/// Replays a local tree, entry by entry, onto the remote.
pub struct Replicator {
    remote: Arc<dyn RemoteFs>,
    task: SyncTask,
    excludes: ExcludePatterns,
    uploader: Uploader,
    stats: RunStats,
}

impl Replicator {
    pub fn new(remote: Arc<dyn RemoteFs>, task: SyncTask) -> Self {
        let excludes = ExcludePatterns::new(task.exclude_patterns.clone());
        let uploader = Uploader::new(task.max_retries, task.backup, task.backup_suffix.clone());
        Self {
            remote,
            task,
            excludes,
            uploader,
            stats: RunStats::new(),
        }
    }

    /// Swap the uploader for one with a different policy (the test suite
    /// shortens the retry backoff this way).
    pub fn with_uploader(mut self, uploader: Uploader) -> Self {
        self.uploader = uploader;
        self
    }

    /// Replicate the whole tree and return the final counters.
    ///
    /// The remote root is ensured before the walk starts and is not
    /// counted. The first fatal error stops the walk immediately, whether
    /// it came from enumeration, directory creation, or a retry-exhausted
    /// upload; files already transferred stay where they are.
    pub async fn run(&self) -> Result<StatsSnapshot, SyncError> {
        ensure_dir(self.remote.as_ref(), &self.task.remote_root).await?;
        self.walk(&self.task.local_root).await?;
        Ok(self.stats.snapshot())
    }

    fn walk<'a>(
        &'a self,
        dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + 'a>> {
        Box::pin(async move {
            let entries = LocalFs::list_dir(dir).map_err(|source| SyncError::Traversal {
                path: dir.to_path_buf(),
                source,
            })?;

            for entry in entries {
                let path = dir.join(&entry.name);

                if entry.is_dir {
                    let remote_path = self.map(&path)?;
                    println!("{} {}", "mkdir".blue(), remote_path);
                    ensure_dir(self.remote.as_ref(), &remote_path).await?;
                    self.stats.record_dir();
                    self.walk(&path).await?;
                } else {
                    let relative = self.relative(&path)?;
                    if self.excludes.is_excluded(&relative) {
                        println!("{} {}", "exclude".yellow(), relative);
                        continue;
                    }

                    let remote_path = self.map(&path)?;
                    println!("{} {} -> {}", "upload".green(), path.display(), remote_path);
                    // Counts attempted files: recorded before the outcome is known.
                    self.stats.record_file(entry.size);
                    self.uploader
                        .upload(self.remote.as_ref(), &path, &remote_path)
                        .await?;
                }
            }

            Ok(())
        })
    }

    fn map(&self, path: &Path) -> Result<String, SyncError> {
        map_remote(&self.task.local_root, path, &self.task.remote_root).map_err(|source| {
            SyncError::Traversal {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    fn relative(&self, path: &Path) -> Result<String, SyncError> {
        relative_local(&self.task.local_root, path).map_err(|source| SyncError::Traversal {
            path: path.to_path_buf(),
            source,
        })
    }
}
