use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Metadata returned by a remote stat call.
#[derive(Debug, Clone)]
pub struct FileStat {
    pub size: u64,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// A remote filesystem reached through an established session.
///
/// Paths are slash-separated strings on the remote side. The wire protocol
/// reports a missing path as a stat error, so `stat` folds every failure
/// into `None`; callers treat `Some` as "something exists here" without
/// inspecting further.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    /// Stat a remote path; `None` when nothing exists there.
    async fn stat(&self, path: &str) -> Result<Option<FileStat>>;

    /// Create a single directory. Ancestors must already exist.
    async fn mkdir(&self, path: &str) -> Result<()>;

    /// Read the full contents of a remote file.
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// Create (or truncate) a remote file and write all bytes to it.
    async fn write_bytes(&self, path: &str, data: Vec<u8>) -> Result<()>;
}
