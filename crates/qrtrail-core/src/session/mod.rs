//! Session domain module.
//!
//! - `model`: identity and the anonymous/authenticated state
//! - `token`: JWT-shaped token encoding with embedded expiry
//! - `repository`: token persistence
//! - `verifier`: credential check boundary

mod model;
mod repository;
pub mod token;
mod verifier;

pub use model::{Identity, SessionState};
pub use repository::TokenRepository;
pub use token::{TokenClaims, decode_token, encode_token};
pub use verifier::CredentialVerifier;
