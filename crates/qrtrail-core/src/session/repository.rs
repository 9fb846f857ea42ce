//! Token repository trait.

use async_trait::async_trait;

use crate::error::Result;

/// Persists the single session token string.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Returns the stored token, if any.
    async fn load(&self) -> Result<Option<String>>;

    async fn store(&self, token: &str) -> Result<()>;

    /// Removes the stored token. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}
