//! Credential verification boundary.

use async_trait::async_trait;

use super::model::Identity;
use crate::error::Result;

/// Checks credentials and creates accounts.
///
/// The session layer never decides on its own whether a login is valid;
/// whatever backs this trait (a local account file, a remote auth API)
/// owns that decision.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the identity for matching credentials, or
    /// `QrError::Authentication` when they do not match.
    async fn verify(&self, email: &str, password: &str) -> Result<Identity>;

    /// Creates an account and returns its identity.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<Identity>;
}
