//! Unified path management for qrtrail files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/qrtrail/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/qrtrail/      # Data directory (or `data_dir` from config)
//! ├── qr_history.json          # History log (JSON array)
//! ├── qr_auth_token            # Session token
//! └── accounts.json            # Local accounts
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "qrtrail";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for qrtrail_core::QrError {
    fn from(err: PathError) -> Self {
        qrtrail_core::QrError::config(err.to_string())
    }
}

/// Persisted files managed by qrtrail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    History,
    Token,
    Accounts,
}

impl ServiceType {
    fn file_name(&self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::History => "qr_history.json",
            ServiceType::Token => "qr_auth_token",
            ServiceType::Accounts => "accounts.json",
        }
    }
}

/// Resolves qrtrail file locations.
///
/// With no overrides, config lives in the platform config directory and
/// data files in the platform data directory. A base path (tests, or
/// `data_dir` from config) replaces the data directory; a config base
/// replaces the config directory.
#[derive(Debug, Clone, Default)]
pub struct QrtrailPaths {
    config_base: Option<PathBuf>,
    data_base: Option<PathBuf>,
}

impl QrtrailPaths {
    pub fn new(data_base: Option<&Path>) -> Self {
        Self {
            config_base: None,
            data_base: data_base.map(Path::to_path_buf),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_base = Some(dir.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_base = Some(dir.into());
        self
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.config_base {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or(PathError::DirNotFound("config")),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.data_base {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or(PathError::DirNotFound("data")),
        }
    }

    /// Full path of a managed file.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        let dir = match service {
            ServiceType::Config => self.config_dir()?,
            ServiceType::History | ServiceType::Token | ServiceType::Accounts => self.data_dir()?,
        };
        Ok(dir.join(service.file_name()))
    }
}
