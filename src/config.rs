//! JSON configuration for a deployment run.
//!
//! Mirrors the config file layout: a `server` block for the SSH session,
//! a `paths` block for the local and remote roots, and an `options` block
//! for the transfer policy.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sync::engine::SyncTask;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Connection parameters for the SSH session.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Connection and per-call timeout in seconds; 0 disables it.
    #[serde(default)]
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub local: String,
    pub remote: String,
}

/// Transfer policy options.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub backup: bool,
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Reserved for chunked transfers; the current transfer path moves
    /// whole files and ignores it.
    #[serde(default)]
    pub chunk_size: usize,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            backup: false,
            backup_suffix: default_backup_suffix(),
            exclude_patterns: Vec::new(),
            max_retries: default_max_retries(),
            chunk_size: 0,
        }
    }
}

fn default_port() -> u16 {
    22
}

fn default_backup_suffix() -> String {
    ".bak".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.username.is_empty() {
            bail!("server.username must not be empty");
        }
        if self.paths.local.is_empty() {
            bail!("paths.local must not be empty");
        }
        if self.paths.remote.is_empty() {
            bail!("paths.remote must not be empty");
        }
        if self.options.max_retries < 1 {
            bail!("options.max_retries must be at least 1");
        }
        Ok(())
    }

    /// Build the immutable unit of work for one run.
    ///
    /// A relative local path is resolved against the current working
    /// directory; the local root must exist and be a directory.
    pub fn task(&self) -> Result<SyncTask> {
        let local_root = PathBuf::from(&self.paths.local);
        let local_root = if local_root.is_absolute() {
            local_root
        } else {
            std::env::current_dir()
                .context("Failed to resolve current working directory")?
                .join(local_root)
        };

        if !local_root.is_dir() {
            bail!("Local directory {} does not exist", local_root.display());
        }

        let remote_root = if self.paths.remote.len() > 1 {
            self.paths.remote.trim_end_matches('/').to_string()
        } else {
            self.paths.remote.clone()
        };

        Ok(SyncTask {
            local_root,
            remote_root,
            exclude_patterns: self.options.exclude_patterns.clone(),
            max_retries: self.options.max_retries,
            backup: self.options.backup,
            backup_suffix: self.options.backup_suffix.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    const MINIMAL: &str = r#"{
        "server": {"host": "deploy.example.com", "username": "ci", "password": "secret"},
        "paths": {"local": "dist", "remote": "/srv/app"}
    }"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(MINIMAL);

        assert_eq!(config.server.port, 22);
        assert_eq!(config.server.timeout, 0);
        assert!(!config.options.backup);
        assert_eq!(config.options.backup_suffix, ".bak");
        assert_eq!(config.options.max_retries, 3);
        assert!(config.options.exclude_patterns.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_options_parse() {
        let config = parse(
            r#"{
                "server": {"host": "h", "port": 2222, "username": "u", "password": "p", "timeout": 30},
                "paths": {"local": "/out", "remote": "/srv/app/"},
                "options": {
                    "backup": true,
                    "backup_suffix": ".old",
                    "exclude_patterns": ["*.log", "tmp"],
                    "max_retries": 5,
                    "chunk_size": 65536
                }
            }"#,
        );

        assert_eq!(config.server.port, 2222);
        assert!(config.options.backup);
        assert_eq!(config.options.backup_suffix, ".old");
        assert_eq!(config.options.exclude_patterns, vec!["*.log", "tmp"]);
        assert_eq!(config.options.max_retries, 5);
        assert_eq!(config.options.chunk_size, 65536);
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = parse(MINIMAL);
        config.options.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut config = parse(MINIMAL);
        config.server.host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_task_strips_trailing_remote_slash() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = parse(MINIMAL);
        config.paths.local = dir.path().to_string_lossy().to_string();
        config.paths.remote = "/srv/app/".to_string();

        let task = config.task().unwrap();
        assert_eq!(task.remote_root, "/srv/app");
    }

    #[test]
    fn test_task_rejects_missing_local_dir() {
        let mut config = parse(MINIMAL);
        config.paths.local = "/definitely/not/a/real/path".to_string();
        assert!(config.task().is_err());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
