//! QR generation flow.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use serde::Serialize;

use qrtrail_core::Result;
use qrtrail_core::clock::Clock;
use qrtrail_core::codec::{Clipboard, EncodeOptions, QrBitmap, QrEncoder};
use qrtrail_core::config::GeneratorSettings;
use qrtrail_core::content::{download_file_name, require_content, share_mailto};
use qrtrail_core::history::{HistoryKind, HistoryRecord};

use crate::history_service::HistoryService;

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub record: HistoryRecord,
    /// `mailto:` link for sharing the content
    pub share_link: String,
    /// Suggested name for the downloaded image
    pub download_file_name: String,
}

impl GeneratedCode {
    pub fn content(&self) -> &str {
        &self.record.content
    }
}

/// Validates generator input, logs it, and hands it to the encoder.
pub struct GenerateService<Z: TimeZone = Local> {
    history: Arc<HistoryService<Z>>,
    clock: Arc<dyn Clock>,
    options: EncodeOptions,
}

impl<Z: TimeZone> GenerateService<Z> {
    pub fn new(history: Arc<HistoryService<Z>>, clock: Arc<dyn Clock>, settings: &GeneratorSettings) -> Self {
        Self {
            history,
            clock,
            options: settings.encode_options(),
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Rejects empty input, otherwise records a `generated` entry.
    pub async fn generate(&self, input: &str) -> Result<GeneratedCode> {
        let content = require_content(input)?;
        let record = self.history.append(content, HistoryKind::Generated).await?;

        Ok(GeneratedCode {
            share_link: share_mailto(&record.content),
            download_file_name: download_file_name(self.clock.now()),
            record,
        })
    }

    pub fn render(&self, encoder: &dyn QrEncoder, code: &GeneratedCode) -> Result<QrBitmap> {
        encoder.encode(code.content(), &self.options)
    }

    pub fn copy(&self, clipboard: &dyn Clipboard, code: &GeneratedCode) -> Result<()> {
        clipboard.copy(code.content())
    }
}
