use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use ssh2::{Session, Sftp};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::fs::backend::{FileStat, RemoteFs};

/// SFTP host reached over an authenticated SSH session.
///
/// libssh2 handles are not thread-safe, so the session lives behind a mutex
/// and calls are issued one at a time. The replication engine is sequential,
/// which makes the lock uncontended in practice.
pub struct SftpFs {
    inner: Mutex<SftpSession>,
}

struct SftpSession {
    // Keeps the SSH transport alive for the lifetime of the SFTP channel.
    _session: Session,
    sftp: Sftp,
}

impl SftpFs {
    /// Connect to the configured server, authenticate with its password,
    /// and open an SFTP channel.
    pub fn connect(server: &ServerConfig) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port);

        let tcp = if server.timeout > 0 {
            let sock = addr
                .to_socket_addrs()
                .with_context(|| format!("Failed to resolve {}", addr))?
                .next()
                .ok_or_else(|| anyhow!("No address found for {}", addr))?;
            TcpStream::connect_timeout(&sock, Duration::from_secs(server.timeout))
                .with_context(|| format!("Failed to connect to {}", addr))?
        } else {
            TcpStream::connect(&addr)
                .with_context(|| format!("Failed to connect to {}", addr))?
        };

        let mut session = Session::new().context("Failed to create SSH session")?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .with_context(|| format!("SSH handshake with {} failed", addr))?;
        session
            .userauth_password(&server.username, &server.password)
            .with_context(|| format!("SSH authentication failed for user {}", server.username))?;

        if server.timeout > 0 {
            // Bounds every blocking libssh2 call for the rest of the run.
            session.set_timeout((server.timeout * 1000) as u32);
        }

        let sftp = session.sftp().context("Failed to open SFTP channel")?;

        Ok(Self {
            inner: Mutex::new(SftpSession {
                _session: session,
                sftp,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SftpSession>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("SFTP session lock poisoned"))
    }
}

#[async_trait]
impl RemoteFs for SftpFs {
    async fn stat(&self, path: &str) -> Result<Option<FileStat>> {
        let guard = self.lock()?;
        match guard.sftp.stat(Path::new(path)) {
            Ok(stat) => Ok(Some(FileStat {
                size: stat.size.unwrap_or(0),
                is_dir: stat.is_dir(),
                modified: stat
                    .mtime
                    .and_then(|t| DateTime::from_timestamp(t as i64, 0)),
            })),
            // libssh2 reports a missing path as an error code.
            Err(_) => Ok(None),
        }
    }

    async fn mkdir(&self, path: &str) -> Result<()> {
        let guard = self.lock()?;
        guard
            .sftp
            .mkdir(Path::new(path), 0o755)
            .with_context(|| format!("Failed to create remote directory: {}", path))?;
        Ok(())
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let guard = self.lock()?;
        let mut file = guard
            .sftp
            .open(Path::new(path))
            .with_context(|| format!("Failed to open remote file: {}", path))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .with_context(|| format!("Failed to read remote file: {}", path))?;
        Ok(data)
    }

    async fn write_bytes(&self, path: &str, data: Vec<u8>) -> Result<()> {
        let guard = self.lock()?;
        let mut file = guard
            .sftp
            .create(Path::new(path))
            .with_context(|| format!("Failed to create remote file: {}", path))?;
        file.write_all(&data)
            .with_context(|| format!("Failed to write remote file: {}", path))?;
        file.flush()
            .with_context(|| format!("Failed to flush remote file: {}", path))?;
        Ok(())
    }
}
