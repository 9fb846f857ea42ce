//! Error types for qrtrail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names of persisted sources carried by `QrError::PersistenceParse`.
pub mod source {
    pub const HISTORY: &str = "qr_history";
    pub const ACCOUNTS: &str = "accounts";
    pub const SESSION_TOKEN: &str = "session token";
}

/// A shared error type for the whole qrtrail stack.
///
/// User-facing failures (`Validation`, `CameraAccess`, `NotAValidUrl`,
/// `Authentication`) are surfaced once as a notice and never retried.
/// Storage failures (`PersistenceParse`, `Io`) bubble up to the caller
/// unchanged.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum QrError {
    /// Rejected user input (empty content, zero page size, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The camera could not be opened or the decoder failed to start
    #[error("Camera access error: {0}")]
    CameraAccess(String),

    /// Persisted data exists but could not be parsed
    #[error("Could not parse persisted {source_name}: {message}")]
    PersistenceParse {
        source_name: String,
        message: String,
    },

    /// Content cannot be turned into a link
    #[error("Not a valid URL: {0}")]
    NotAValidUrl(String),

    /// Credentials rejected by the verifier
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization error on the write path
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QrError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a CameraAccess error
    pub fn camera(message: impl Into<String>) -> Self {
        Self::CameraAccess(message.into())
    }

    /// Creates a PersistenceParse error for the named persisted source
    pub fn persistence_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a NotAValidUrl error
    pub fn not_a_valid_url(content: impl Into<String>) -> Self {
        Self::NotAValidUrl(content.into())
    }

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_camera_access(&self) -> bool {
        matches!(self, Self::CameraAccess(_))
    }

    pub fn is_persistence_parse(&self) -> bool {
        matches!(self, Self::PersistenceParse { .. })
    }

    pub fn is_not_a_valid_url(&self) -> bool {
        matches!(self, Self::NotAValidUrl(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Short title used when the error is shown as a one-shot notice.
    pub fn notice_title(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Error",
            Self::CameraAccess(_) => "Camera Error",
            Self::PersistenceParse { source_name, .. } => match source_name.as_str() {
                source::HISTORY => "Could not load QR code history",
                source::ACCOUNTS => "Could not load accounts",
                source::SESSION_TOKEN => "Could not restore session",
                _ => "Could not load saved data",
            },
            Self::NotAValidUrl(_) => "Not a Valid URL",
            Self::Authentication(_) => "Login failed",
            Self::Io { .. } | Self::Serialization { .. } => "Storage error",
            Self::Config(_) => "Configuration error",
            Self::Internal(_) => "Unexpected error",
        }
    }

    /// Notice title for a failed account registration. Rejected
    /// credentials read "Registration failed" instead of "Login failed".
    pub fn registration_notice_title(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "Registration failed",
            other => other.notice_title(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for QrError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for QrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for QrError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for QrError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (for adapters that report through anyhow)
impl From<anyhow::Error> for QrError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, QrError>`.
pub type Result<T> = std::result::Result<T, QrError>;
