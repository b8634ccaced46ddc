//! Fatal error taxonomy for a replication run.

use std::fmt;
use std::path::PathBuf;

/// A failure that aborts the run immediately.
///
/// There is no skip-and-continue: the first of these stops the walk, and
/// files already transferred are not rolled back. Backup failures are not
/// represented here; they are narrated as warnings and never escalate.
#[derive(Debug)]
pub enum SyncError {
    /// Local enumeration failed.
    Traversal {
        path: PathBuf,
        source: anyhow::Error,
    },
    /// A remote directory could not be created and did not already exist.
    DirectoryEnsure {
        path: String,
        source: anyhow::Error,
    },
    /// Every transfer attempt for one file failed.
    Upload {
        path: String,
        attempts: u32,
        source: anyhow::Error,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncError::Traversal { path, source } => {
                write!(
                    f,
                    "Failed to walk local directory {}: {}",
                    path.display(),
                    source
                )
            }
            SyncError::DirectoryEnsure { path, source } => {
                write!(f, "Failed to create remote directory {}: {}", path, source)
            }
            SyncError::Upload {
                path,
                attempts,
                source,
            } => {
                write!(
                    f,
                    "Upload of {} failed after {} attempts: {}",
                    path, attempts, source
                )
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Traversal { source, .. }
            | SyncError::DirectoryEnsure { source, .. }
            | SyncError::Upload { source, .. } => Some(&**source),
        }
    }
}
