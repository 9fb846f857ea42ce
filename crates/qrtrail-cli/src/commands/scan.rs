use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use qrtrail_application::ScanOutcome;
use qrtrail_core::codec::{FrameDecoder, ScanOptions};
use qrtrail_core::content::resolve_link;
use qrtrail_core::{QrError, Result as QrResult};

use crate::app::App;

/// Feeds text lines to a scan session as decoded frames.
///
/// Stands in for a camera: each line is one frame, a blank line is a
/// frame without a readable code, and end of input means the device is
/// gone.
pub struct LineFrameDecoder<R> {
    source: Option<R>,
    lines: Option<Lines<R>>,
}

impl<R: AsyncBufRead + Unpin + Send> LineFrameDecoder<R> {
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            lines: None,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> FrameDecoder for LineFrameDecoder<R> {
    async fn start(&mut self, _options: &ScanOptions) -> QrResult<()> {
        let source = self
            .source
            .take()
            .ok_or_else(|| QrError::camera("Input already consumed"))?;
        self.lines = Some(source.lines());
        Ok(())
    }

    async fn next_frame(&mut self) -> QrResult<Option<String>> {
        let lines = self
            .lines
            .as_mut()
            .ok_or_else(|| QrError::camera("Scanner not started"))?;

        match lines.next_line().await? {
            Some(line) => {
                let line = line.trim();
                Ok((!line.is_empty()).then(|| line.to_string()))
            }
            None => Err(QrError::camera("Input closed before a code was read")),
        }
    }

    async fn stop(&mut self) -> QrResult<()> {
        self.lines = None;
        Ok(())
    }
}

pub async fn scan(app: &App, text: Option<String>) -> Result<()> {
    let mut session = app.scan_session();

    match text {
        Some(text) => {
            let source = BufReader::new(std::io::Cursor::new(text.into_bytes()));
            session.start(Box::new(LineFrameDecoder::new(source))).await?;
        }
        None => {
            let source = BufReader::new(tokio::io::stdin());
            session.start(Box::new(LineFrameDecoder::new(source))).await?;
        }
    }

    match session.wait().await? {
        ScanOutcome::Decoded(record) => {
            println!("Scanned: {}", record.content);
            match resolve_link(&record.content) {
                Ok(url) => println!("  Link:  {}", url),
                Err(_) => println!("  (not a link)"),
            }
        }
        ScanOutcome::Cancelled => println!("Scan cancelled"),
    }
    Ok(())
}

pub fn open(text: &str) -> Result<()> {
    let url = resolve_link(text)?;
    println!("{}", url);
    Ok(())
}
