//! Camera scan lifecycle.
//!
//! A started session owns the decoder on a spawned task that samples one
//! frame per tick. The first frame that decodes to non-empty text stops
//! the decoder and is logged as a `scanned` record.

use std::sync::Arc;

use chrono::{Local, TimeZone};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use qrtrail_core::codec::{FrameDecoder, ScanOptions};
use qrtrail_core::history::{HistoryKind, HistoryRecord};
use qrtrail_core::{QrError, Result};

use crate::history_service::HistoryService;

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A code was read and recorded
    Decoded(HistoryRecord),
    /// The scan was stopped before anything was read
    Cancelled,
}

pub struct ScanSession<Z: TimeZone = Local> {
    history: Arc<HistoryService<Z>>,
    options: ScanOptions,
    handle: Option<JoinHandle<Result<ScanOutcome>>>,
    cancel_token: Option<CancellationToken>,
}

impl<Z> ScanSession<Z>
where
    Z: TimeZone + Send + Sync + 'static,
{
    pub fn new(history: Arc<HistoryService<Z>>, options: ScanOptions) -> Self {
        Self {
            history,
            options,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// True while the polling task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Opens the camera and starts polling.
    ///
    /// Fails if a scan is already running. A decoder that cannot start is
    /// reported as `CameraAccess` and the session stays idle.
    pub async fn start(&mut self, mut decoder: Box<dyn FrameDecoder>) -> Result<()> {
        if self.is_active() {
            return Err(QrError::validation("A scan is already in progress"));
        }

        if let Err(e) = decoder.start(&self.options).await {
            tracing::warn!("[ScanSession] Camera failed to start: {}", e);
            return Err(match e {
                QrError::CameraAccess(_) => e,
                other => QrError::camera(other.to_string()),
            });
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(scan_loop(
            self.history.clone(),
            decoder,
            self.options.frame_interval(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        tracing::info!("[ScanSession] Scanning at {} fps", self.options.fps);
        Ok(())
    }

    /// Waits for the running scan to finish on its own.
    pub async fn wait(&mut self) -> Result<ScanOutcome> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| QrError::validation("No scan in progress"))?;
        self.cancel_token = None;
        join(handle).await
    }

    /// Cancels the running scan and stops the camera.
    ///
    /// Returns `None` when no scan was started. A code read just before
    /// cancellation is still returned as `Decoded`.
    pub async fn stop(&mut self) -> Result<Option<ScanOutcome>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => join(handle).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<Z: TimeZone> Drop for ScanSession<Z> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

async fn join(handle: JoinHandle<Result<ScanOutcome>>) -> Result<ScanOutcome> {
    handle
        .await
        .map_err(|e| QrError::internal(format!("scan task failed to join: {}", e)))?
}

async fn scan_loop<Z>(
    history: Arc<HistoryService<Z>>,
    mut decoder: Box<dyn FrameDecoder>,
    interval: Duration,
    cancel_token: CancellationToken,
) -> Result<ScanOutcome>
where
    Z: TimeZone + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let decoded = loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                tracing::info!("[ScanSession] Scan cancelled");
                stop_decoder(decoder.as_mut()).await;
                return Ok(ScanOutcome::Cancelled);
            }
            _ = ticker.tick() => {
                match decoder.next_frame().await {
                    Ok(Some(text)) if !text.is_empty() => break text,
                    Ok(_) => {}
                    Err(e) if e.is_camera_access() => {
                        tracing::warn!("[ScanSession] Camera lost: {}", e);
                        stop_decoder(decoder.as_mut()).await;
                        return Err(e);
                    }
                    // Unreadable frames are expected while the code is out of focus
                    Err(e) => tracing::trace!("[ScanSession] Frame skipped: {}", e),
                }
            }
        }
    };

    // A decoded code is recorded even if the camera refuses to stop
    stop_decoder(decoder.as_mut()).await;
    let record = history.append(&decoded, HistoryKind::Scanned).await?;
    Ok(ScanOutcome::Decoded(record))
}

async fn stop_decoder(decoder: &mut dyn FrameDecoder) {
    if let Err(e) = decoder.stop().await {
        tracing::warn!("[ScanSession] Failed to stop camera: {}", e);
    }
}
