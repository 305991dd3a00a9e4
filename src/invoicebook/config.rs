//! # Configuration
//!
//! Store configuration is managed by [`confique`], which handles layered
//! loading from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `INVOICEBOOK_BACKEND`, `INVOICEBOOK_FILE_PATH`,
//!    `INVOICEBOOK_LOG`.
//! 2. **Config file**: the TOML file passed to [`StoreConfig::load`], if any.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `backend` | `in-file` | `in-file` or `in-memory` |
//! | `file_path` | `invoices.jsonl` | Backing file of the in-file store |
//! | `log_filter` | `info` | `tracing` filter directive, see [`crate::logging`] |

use crate::error::ConfigError;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which repository implementation [`crate::store::open`] builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    InMemory,
    InFile,
}

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage backend: "in-file" or "in-memory".
    #[config(env = "INVOICEBOOK_BACKEND", default = "in-file")]
    pub backend: Backend,

    /// Path of the JSON-lines file used by the in-file backend.
    #[config(env = "INVOICEBOOK_FILE_PATH", default = "invoices.jsonl")]
    pub file_path: PathBuf,

    /// Log filter, e.g. "info" or "invoicebook=debug".
    #[config(env = "INVOICEBOOK_LOG", default = "info")]
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::InFile,
            file_path: PathBuf::from("invoices.jsonl"),
            log_filter: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the environment, then `file` (skipped if it
    /// does not exist), then defaults.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, Backend::InFile);
        assert_eq!(config.file_path, PathBuf::from("invoices.jsonl"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoicebook.toml");
        fs::write(
            &path,
            "backend = \"in-memory\"\nfile_path = \"/var/lib/invoices.jsonl\"\n",
        )
        .unwrap();

        let config = StoreConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backend, Backend::InMemory);
        assert_eq!(config.file_path, PathBuf::from("/var/lib/invoices.jsonl"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::builder()
            .file(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert_eq!(config.backend, Backend::InFile);
    }

    #[test]
    fn test_invalid_backend_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoicebook.toml");
        fs::write(&path, "backend = \"mongo\"\n").unwrap();
        assert!(StoreConfig::builder().file(&path).load().is_err());
    }
}
