//! Credential verifier backed by a local account file.
//!
//! Accounts live in `accounts.json`; passwords are stored as salted
//! SHA-256 digests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use uuid::Uuid;

use qrtrail_core::session::{CredentialVerifier, Identity};
use qrtrail_core::error::source;
use qrtrail_core::{QrError, Result};

use crate::paths::{QrtrailPaths, ServiceType};
use crate::storage::AtomicFile;

const ACCOUNTS_SOURCE: &str = source::ACCOUNTS;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    id: String,
    email: String,
    name: String,
    salt: String,
    password_hash: String,
}

impl StoredAccount {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.name.clone(),
        }
    }

    fn matches(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.password_hash
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Verifies credentials against locally registered accounts.
pub struct LocalAccountVerifier {
    file: AtomicFile<Vec<StoredAccount>>,
}

impl LocalAccountVerifier {
    pub fn new(paths: &QrtrailPaths) -> Result<Self> {
        Ok(Self::with_path(paths.get_path(ServiceType::Accounts)?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::json(path),
        }
    }
}

#[async_trait]
impl CredentialVerifier for LocalAccountVerifier {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity> {
        let file = self.file.clone();
        let accounts = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| QrError::internal(format!("account file task failed: {}", e)))?
            .map_err(|e| e.into_qr_error(ACCOUNTS_SOURCE))?
            .unwrap_or_default();

        accounts
            .iter()
            .find(|a| same_email(&a.email, email))
            .filter(|a| a.matches(password))
            .map(StoredAccount::identity)
            .ok_or_else(|| QrError::authentication(INVALID_CREDENTIALS))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<Identity> {
        let salt = Uuid::new_v4().simple().to_string();
        let account = StoredAccount {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            password_hash: hash_password(&salt, password),
            salt,
        };
        let identity = account.identity();

        let file = self.file.clone();
        let inserted = tokio::task::spawn_blocking(move || {
            let mut inserted = false;
            let result = file.update(|current| {
                let mut accounts = current.unwrap_or_default();
                if !accounts.iter().any(|a| same_email(&a.email, &account.email)) {
                    accounts.push(account);
                    inserted = true;
                }
                accounts
            });
            result.map(|_| inserted)
        })
        .await
        .map_err(|e| QrError::internal(format!("account file task failed: {}", e)))?
        .map_err(|e| e.into_qr_error(ACCOUNTS_SOURCE))?;

        if !inserted {
            return Err(QrError::authentication(format!(
                "An account for {} already exists",
                email.trim()
            )));
        }

        tracing::info!("[LocalAccountVerifier] Registered account {}", identity.id);
        Ok(identity)
    }
}
