//! Image payload encoding shared by the upload and gallery paths.
//!
//! Payloads travel as bare base64; data URIs only exist at the edges (file
//! encoding on upload, image reconstruction on display).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type assumed when rebuilding an image from a stored payload.
pub const DISPLAY_MIME: &str = "image/png";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Errors produced while converting between bytes, payloads and data URIs.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The input was not a `data:<mime>;base64,<payload>` string.
    #[error("malformed data uri: missing ',' separator")]
    MissingSeparator,
    /// The payload was not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Guess the MIME type of image bytes from their magic number.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        FALLBACK_MIME
    }
}

/// Encode raw bytes as a `data:<mime>;base64,...` URI.
pub fn encode_data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), STANDARD.encode(bytes))
}

/// Drop everything up to and including the first comma of a data URI.
pub fn strip_data_uri_prefix(data_uri: &str) -> Result<&str, PayloadError> {
    data_uri
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or(PayloadError::MissingSeparator)
}

/// Rebuild a displayable data URI from a stored payload.
pub fn display_data_uri(payload: &str) -> String {
    format!("data:{DISPLAY_MIME};base64,{payload}")
}

/// Decode a bare base64 payload back into bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, PayloadError> {
    Ok(STANDARD.decode(payload.trim())?)
}
