use chrono::{DateTime, Utc};

/// One local file-or-directory node produced by directory enumeration.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub modified: Option<DateTime<Utc>>,
}
