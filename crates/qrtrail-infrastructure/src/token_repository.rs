//! Session token persistence.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

use qrtrail_core::Result;
use qrtrail_core::session::TokenRepository;

use crate::paths::{QrtrailPaths, ServiceType};

/// Stores the token as the sole content of `qr_auth_token`.
///
/// # Security Note
///
/// On Unix the file is restricted to mode 600 after every write.
pub struct FileTokenRepository {
    path: PathBuf,
}

impl FileTokenRepository {
    pub fn new(paths: &QrtrailPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Token)?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TokenRepository for FileTokenRepository {
    async fn load(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the token in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenRepository {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn store(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}
