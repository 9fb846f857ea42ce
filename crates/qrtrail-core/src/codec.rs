//! Interfaces to the external QR collaborators.
//!
//! Encoding, camera capture and decoding are owned by third-party
//! libraries; qrtrail only defines the seams and the options passed
//! through them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    #[default]
    High,
}

/// Rendering options handed to a [`QrEncoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Edge length of the rendered image in pixels
    pub size: u32,
    pub error_correction: ErrorCorrection,
    pub include_margin: bool,
    pub foreground: String,
    pub background: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            size: 200,
            error_correction: ErrorCorrection::High,
            include_margin: true,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

/// A rendered QR code, row-major, one byte per pixel (0 = dark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Turns text into a renderable bitmap.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<QrBitmap>;
}

/// Which camera to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    User,
    #[default]
    Environment,
}

/// Capture options handed to a [`FrameDecoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    /// Frames sampled per second
    pub fps: u32,
    /// Edge length of the square scan region in pixels
    pub qrbox: u32,
    pub aspect_ratio: f32,
    pub facing: CameraFacing,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            fps: 10,
            qrbox: 250,
            aspect_ratio: 1.0,
            facing: CameraFacing::Environment,
        }
    }
}

impl ScanOptions {
    /// Delay between two sampled frames.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

/// Camera stream decoder with an explicit start/stop lifecycle.
///
/// `start` fails with `QrError::CameraAccess` when the camera cannot be
/// opened. `next_frame` samples one frame and returns the decoded text,
/// or `None` when the frame holds no readable code.
#[async_trait]
pub trait FrameDecoder: Send {
    async fn start(&mut self, options: &ScanOptions) -> Result<()>;

    async fn next_frame(&mut self) -> Result<Option<String>>;

    async fn stop(&mut self) -> Result<()>;
}

/// System clipboard.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}
