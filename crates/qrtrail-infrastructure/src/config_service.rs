//! Configuration service.
//!
//! Reads `config.toml`, writing the defaults on first use.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use qrtrail_core::config::AppConfig;
use qrtrail_core::{QrError, Result};

use crate::paths::{QrtrailPaths, ServiceType};
use crate::storage::{AtomicFile, StorageError};

/// Loads and caches [`AppConfig`].
///
/// # Example
///
/// ```ignore
/// use qrtrail_infrastructure::ConfigService;
///
/// let service = ConfigService::new(&QrtrailPaths::default())?;
/// let config = service.load()?;
/// ```
#[derive(Clone)]
pub struct ConfigService {
    file: AtomicFile<AppConfig>,
    cached: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &QrtrailPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Config)?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::toml(path),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration, creating the file with defaults if it is
    /// missing.
    pub fn load(&self) -> Result<AppConfig> {
        {
            let read_lock = self.cached.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let config = match self.file.load().map_err(config_error)? {
            Some(config) => config,
            None => {
                let defaults = AppConfig::default();
                self.file.save(&defaults).map_err(config_error)?;
                tracing::info!("[ConfigService] Created default config at {}", self.path().display());
                defaults
            }
        };

        let mut write_lock = self.cached.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());

        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config).map_err(config_error)?;

        let mut write_lock = self.cached.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }
}

fn config_error(err: StorageError) -> QrError {
    match err {
        StorageError::ParseError { message, .. } => QrError::config(message),
        other => other.into_qr_error("config"),
    }
}
