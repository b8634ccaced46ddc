//! Directory replication onto a remote host.
//!
//! This module holds the synchronization engine: path mapping, exclusion
//! filtering, idempotent remote directory creation, retrying upload, and
//! run statistics.

pub mod engine;
pub mod error;
pub mod exclude;
pub mod path;
pub mod stats;
pub mod transfer;

pub use engine::{Replicator, SyncTask};
pub use error::SyncError;
pub use exclude::ExcludePatterns;
pub use path::{map_remote, relative_local, remote_parent};
pub use stats::{RunStats, StatsSnapshot, SyncReport};
pub use transfer::{ensure_dir, Uploader};
