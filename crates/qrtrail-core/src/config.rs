//! Application configuration model.
//!
//! Loaded from `config.toml`; every field has a default so a partial or
//! missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::{EncodeOptions, ErrorCorrection, ScanOptions};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Overrides the platform data directory for history and session files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub scanner: ScannerSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HistorySettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Write a synthetic dataset on first initialization.
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
    /// Seeded records are spread over this many days before now.
    #[serde(default = "default_seed_window_days")]
    pub seed_window_days: u32,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            seed_sample_data: true,
            seed_count: default_seed_count(),
            seed_window_days: default_seed_window_days(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionSettings {
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl SessionSettings {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.token_ttl_hours))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    #[serde(default = "default_qr_size")]
    pub size: u32,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
    #[serde(default = "default_true")]
    pub include_margin: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            size: default_qr_size(),
            error_correction: ErrorCorrection::default(),
            include_margin: true,
        }
    }
}

impl GeneratorSettings {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            size: self.size,
            error_correction: self.error_correction,
            include_margin: self.include_margin,
            ..EncodeOptions::default()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScannerSettings {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_qrbox")]
    pub qrbox: u32,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            qrbox: default_qrbox(),
        }
    }
}

impl ScannerSettings {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            fps: self.fps,
            qrbox: self.qrbox,
            ..ScanOptions::default()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    10
}

fn default_seed_count() -> usize {
    15
}

fn default_seed_window_days() -> u32 {
    30
}

fn default_token_ttl_hours() -> u32 {
    24 * 7
}

fn default_qr_size() -> u32 {
    200
}

fn default_fps() -> u32 {
    10
}

fn default_qrbox() -> u32 {
    250
}
