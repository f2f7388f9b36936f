//! `data:` URL encoding for image payloads.

use crate::error::MediaError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Payload of a decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedDataUrl {
    /// File extension matching the MIME type, for saving to disk.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Build `data:<mime>;base64,<payload>`.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Parse a base64 data URL back into its MIME type and bytes.
pub fn decode_data_url(url: &str) -> Result<DecodedDataUrl, MediaError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| MediaError::InvalidDataUrl("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MediaError::InvalidDataUrl("missing ',' separator".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| MediaError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| MediaError::InvalidDataUrl(e.to_string()))?;

    Ok(DecodedDataUrl {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
