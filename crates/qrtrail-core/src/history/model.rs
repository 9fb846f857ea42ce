//! History record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::QrError;

/// Provenance of a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Produced from generator input
    Generated,
    /// Decoded from the camera
    Scanned,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Scanned => "scanned",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generated" => Ok(Self::Generated),
            "scanned" => Ok(Self::Scanned),
            other => Err(QrError::validation(format!(
                "unknown history kind '{}' (expected 'generated' or 'scanned')",
                other
            ))),
        }
    }
}

/// One logged scan or generation event.
///
/// Records are append-only: once created neither the content, the kind
/// nor the timestamp changes.
///
/// Wire shape: `{"id", "content", "type", "createdAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Opaque unique identifier (`qr-<uuid>`)
    pub id: String,
    /// URL or free text
    pub content: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Sole sort and filter key
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Creates a record with a fresh identifier.
    pub fn new(content: impl Into<String>, kind: HistoryKind, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_record_id(),
            content: content.into(),
            kind,
            created_at,
        }
    }
}

/// Body of a "new history entry" request: `{content, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryEntry {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
}

pub(crate) fn new_record_id() -> String {
    format!("qr-{}", Uuid::new_v4())
}
