pub mod backend;
pub mod local;
pub mod sftp;
pub mod types;

pub use backend::{FileStat, RemoteFs};
pub use local::{LocalDir, LocalFs};
pub use sftp::SftpFs;
pub use types::*;
