//! Error types for the media crate.

use thiserror::Error;

/// Errors that can occur while normalizing an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The input bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The output surface could not be created or encoded.
    #[error("failed to render image: {0}")]
    Render(String),

    /// A string is not a base64 data URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),
}
