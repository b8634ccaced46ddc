//! Run-scoped transfer statistics.
//!
//! Counters are atomic so the aggregator stays correct if the walk is ever
//! parallelised; the current walk is single-threaded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters incremented while a run is in flight.
#[derive(Debug, Default)]
pub struct RunStats {
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file selected for upload.
    ///
    /// Called before the transfer outcome is known: the counters reflect
    /// attempted files, not confirmed ones.
    pub fn record_file(&self, bytes: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a visited remote directory.
    pub fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the counters once the run has finished.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files: self.files.load(Ordering::Relaxed),
            dirs: self.dirs.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the run counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

/// Final aggregate reported after a successful run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub files_uploaded: u64,
    pub dirs_created: u64,
    pub total_bytes: u64,
    pub upload_duration: Duration,
    pub total_duration: Duration,
}

impl SyncReport {
    pub fn new(
        snapshot: StatsSnapshot,
        upload_duration: Duration,
        total_duration: Duration,
    ) -> Self {
        Self {
            files_uploaded: snapshot.files,
            dirs_created: snapshot.dirs,
            total_bytes: snapshot.bytes,
            upload_duration,
            total_duration,
        }
    }

    /// Average transfer rate in MB/s; zero when the upload took no time.
    pub fn throughput_mbps(&self) -> f64 {
        let secs = self.upload_duration.as_secs_f64();
        if secs > 0.0 {
            self.total_bytes as f64 / secs / 1024.0 / 1024.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = RunStats::new();
        stats.record_dir();
        stats.record_file(10);
        stats.record_file(32);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.dirs, 1);
        assert_eq!(snapshot.files, 2);
        assert_eq!(snapshot.bytes, 42);
    }

    #[test]
    fn test_throughput_zero_for_zero_duration() {
        let snapshot = StatsSnapshot {
            files: 1,
            dirs: 0,
            bytes: 1_000_000,
        };
        let report = SyncReport::new(snapshot, Duration::ZERO, Duration::ZERO);
        assert_eq!(report.throughput_mbps(), 0.0);
    }

    #[test]
    fn test_throughput_scales_with_duration() {
        let snapshot = StatsSnapshot {
            files: 1,
            dirs: 0,
            bytes: 2 * 1024 * 1024,
        };
        let report = SyncReport::new(snapshot, Duration::from_secs(1), Duration::from_secs(2));
        assert!((report.throughput_mbps() - 2.0).abs() < f64::EPSILON);
    }
}
