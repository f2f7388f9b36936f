//! # bugdesk-media
//!
//! Screenshot normalization for report submission.
//!
//! Every attachment is decoded, downscaled so that neither edge exceeds
//! [`MAX_DIMENSION`] pixels (aspect ratio preserved, never upscaled), and
//! re-encoded as JPEG at a fixed quality of [`JPEG_QUALITY`]. The result is a
//! self-describing `data:image/jpeg;base64,...` string that can be embedded in
//! a JSON body and rendered later without a separate fetch.
//!
//! Re-encoding is never skipped, even when no resize is needed: the quality
//! pass is what bounds the payload size.
//!
//! ```rust,no_run
//! use bugdesk_media::{ImageNormalizer, JpegNormalizer};
//!
//! # fn example(bytes: &[u8]) -> Result<(), bugdesk_media::MediaError> {
//! let normalized = JpegNormalizer::default().normalize(bytes)?;
//! assert!(normalized.width.max(normalized.height) <= 1280);
//! assert!(normalized.data_url.starts_with("data:image/jpeg;base64,"));
//! # Ok(())
//! # }
//! ```

pub mod data_url;
pub mod error;
pub mod normalizer;

pub use data_url::{DecodedDataUrl, decode_data_url, encode_data_url};
pub use error::MediaError;
pub use normalizer::{
    ImageNormalizer, JPEG_QUALITY, JpegNormalizer, MAX_DIMENSION, NormalizedImage,
    target_dimensions,
};
