//! Session token encoding.
//!
//! Tokens are JWT-shaped: `header.claims.signature`, each segment base64url
//! without padding. The header is always `{"alg":"none","typ":"JWT"}` and
//! the signature segment is empty. Tokens carry identity and expiry; they
//! are decoded and expiry-checked, never cryptographically verified.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::Identity;
use crate::error::{QrError, Result, source};

const TOKEN_HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;
const TOKEN_SOURCE: &str = source::SESSION_TOKEN;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Identity id
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued at, seconds since the Unix epoch
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(identity: &Identity, issued_at: DateTime<Utc>, ttl: chrono::Duration) -> Self {
        Self {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.display_name.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            email: self.email.clone(),
            display_name: self.name.clone(),
        }
    }

    /// A token is live while its expiry is strictly in the future.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.exp > now.timestamp()
    }
}

pub fn encode_token(claims: &TokenClaims) -> Result<String> {
    let payload = serde_json::to_vec(claims)?;
    Ok(format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(TOKEN_HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    ))
}

/// Decodes the claims segment of a token.
///
/// Fails with `QrError::PersistenceParse` on anything that is not a
/// three-segment token with a JSON claims object.
pub fn decode_token(token: &str) -> Result<TokenClaims> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(claims), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(QrError::persistence_parse(
            TOKEN_SOURCE,
            "expected three dot-separated segments",
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(claims)
        .map_err(|e| QrError::persistence_parse(TOKEN_SOURCE, e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| QrError::persistence_parse(TOKEN_SOURCE, e.to_string()))
}
