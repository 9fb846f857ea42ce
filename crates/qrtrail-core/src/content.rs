//! Rules for generator input and scanned content.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::error::{QrError, Result};

const EMPTY_INPUT_MESSAGE: &str = "Please enter a URL or text";
const SHARE_SUBJECT: &str = "Check out this QR Code";

/// Rejects empty (or whitespace-only) input. Returns the input unchanged.
pub fn require_content(input: &str) -> Result<&str> {
    if input.trim().is_empty() {
        return Err(QrError::validation(EMPTY_INPUT_MESSAGE));
    }
    Ok(input)
}

/// Turns scanned content into a link that can be opened.
///
/// Absolute URLs are returned as parsed. Bare host-like text
/// (`example.com/path`) gets an `https://` prefix. Anything else is
/// `QrError::NotAValidUrl`.
pub fn resolve_link(content: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(content) {
        return Ok(url);
    }

    if content.contains('.') && !content.starts_with("http") {
        return Url::parse(&format!("https://{}", content))
            .map_err(|_| QrError::not_a_valid_url(content));
    }

    Err(QrError::not_a_valid_url(content))
}

/// `mailto:` link that shares the generated content by email.
pub fn share_mailto(content: &str) -> String {
    let body = format!("I've generated a QR code for: {}", content);
    format!(
        "mailto:?subject={}&body={}",
        encode_uri_component(SHARE_SUBJECT),
        encode_uri_component(&body)
    )
}

/// File name for a downloaded QR image, stamped with `at`.
pub fn download_file_name(at: DateTime<Utc>) -> String {
    format!("qrcode-{}.png", at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// Percent-encodes everything outside the RFC 3986 unreserved set and `!*'()`.
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
