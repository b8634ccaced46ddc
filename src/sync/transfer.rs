//! Remote directory creation and retrying file upload.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

use crate::fs::backend::RemoteFs;
use crate::sync::error::SyncError;
use crate::sync::path::remote_parent;

/// Pause unit between retry attempts.
const RETRY_UNIT: Duration = Duration::from_secs(1);

/// Idempotently create a remote directory and all of its ancestors.
///
/// Anything already existing at `path` counts as success; the entity's kind
/// is not inspected. Otherwise the parent chain is ensured first, then a
/// single creation call is issued for `path` itself. Recursion stops at the
/// empty path or the root, which succeed trivially. A creation failure not
/// explained by pre-existence is fatal.
pub fn ensure_dir<'a>(
    remote: &'a dyn RemoteFs,
    path: &'a str,
) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + 'a>> {
    Box::pin(async move {
        if path.is_empty() || path == "/" {
            return Ok(());
        }

        if let Ok(Some(_)) = remote.stat(path).await {
            return Ok(());
        }

        ensure_dir(remote, remote_parent(path)).await?;

        remote
            .mkdir(path)
            .await
            .map_err(|source| SyncError::DirectoryEnsure {
                path: path.to_string(),
                source,
            })
    })
}

/// Per-file transfer policy: optional pre-upload backup plus bounded retry
/// with linear backoff.
#[derive(Debug, Clone)]
pub struct Uploader {
    max_retries: u32,
    backup: bool,
    backup_suffix: String,
    retry_unit: Duration,
}

impl Uploader {
    pub fn new(max_retries: u32, backup: bool, backup_suffix: String) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backup,
            backup_suffix,
            retry_unit: RETRY_UNIT,
        }
    }

    /// Override the backoff unit (the test suite shortens it).
    pub fn with_retry_unit(mut self, unit: Duration) -> Self {
        self.retry_unit = unit;
        self
    }

    /// Upload one local file to `remote_path`.
    ///
    /// The backup, when enabled, runs once before the first attempt and its
    /// failure only produces a warning. The destination's directory is then
    /// ensured; failing that is fatal. Transfer attempts run up to
    /// `max_retries` times, sleeping `k` backoff units after failed attempt
    /// `k`. The backoff grows linearly with no cap and no jitter.
    pub async fn upload(
        &self,
        remote: &dyn RemoteFs,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<(), SyncError> {
        if self.backup {
            if let Err(err) = self.backup_existing(remote, remote_path).await {
                println!(
                    "{} backup of {} failed: {:#}",
                    "warning:".yellow().bold(),
                    remote_path,
                    err
                );
            }
        }

        ensure_dir(remote, remote_parent(remote_path)).await?;

        let mut last_err = None;
        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                println!(
                    "{} {} (attempt {}/{})",
                    "retry".yellow(),
                    remote_path,
                    attempt,
                    self.max_retries
                );
            }

            match self.transfer(remote, local_path, remote_path).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    println!(
                        "{} {} (attempt {}/{}): {:#}",
                        "failed".red(),
                        remote_path,
                        attempt,
                        self.max_retries,
                        err
                    );
                    last_err = Some(err);
                }
            }

            if attempt < self.max_retries {
                sleep(self.retry_unit * attempt).await;
            }
        }

        Err(SyncError::Upload {
            path: remote_path.to_string(),
            attempts: self.max_retries,
            source: last_err.unwrap_or_else(|| anyhow!("no transfer attempt was made")),
        })
    }

    /// Copy the current remote content aside before it is overwritten.
    ///
    /// A missing remote file makes this a no-op; nothing is created.
    async fn backup_existing(&self, remote: &dyn RemoteFs, remote_path: &str) -> Result<()> {
        if !matches!(remote.stat(remote_path).await, Ok(Some(_))) {
            return Ok(());
        }

        let backup_path = format!("{}{}", remote_path, self.backup_suffix);
        println!("{} {} -> {}", "backup".cyan(), remote_path, backup_path);

        let data = remote
            .read_bytes(remote_path)
            .await
            .with_context(|| format!("Failed to read {}", remote_path))?;
        remote
            .write_bytes(&backup_path, data)
            .await
            .with_context(|| format!("Failed to write {}", backup_path))
    }

    async fn transfer(
        &self,
        remote: &dyn RemoteFs,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<()> {
        let data = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("Failed to read local file {}", local_path.display()))?;
        remote
            .write_bytes(remote_path, data)
            .await
            .with_context(|| format!("Failed to write {}", remote_path))
    }
}
