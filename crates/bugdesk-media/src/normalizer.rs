//! Bounded resize + JPEG re-encode.

use crate::data_url::encode_data_url;
use crate::error::MediaError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

/// Longest edge allowed after normalization, in pixels.
pub const MAX_DIMENSION: u32 = 1280;

/// JPEG quality factor applied to every attachment.
pub const JPEG_QUALITY: f32 = 0.7;

const OUTPUT_MIME: &str = "image/jpeg";

/// Result of normalizing one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    pub original_width: u32,
    pub original_height: u32,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded JPEG before base64.
    pub encoded_len: usize,
}

/// Turns raw image bytes into a bounded, re-encoded data URL.
pub trait ImageNormalizer: Send + Sync {
    fn normalize(&self, image_bytes: &[u8]) -> Result<NormalizedImage, MediaError>;
}

/// Compute the output size for a `width × height` source.
///
/// Landscape images wider than `max` are scaled by `max / width`; otherwise
/// images taller than `max` are scaled by `max / height`. Images already
/// within bounds keep their size. Scaled edges are truncated and never drop
/// below one pixel.
pub fn target_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale_to = |edge: u32, long: u32| -> u32 {
        let scaled = (edge as f64 * max as f64 / long as f64) as u32;
        scaled.max(1)
    };

    if width > height {
        if width > max {
            return (max, scale_to(height, width));
        }
    } else if height > max {
        return (scale_to(width, height), max);
    }
    (width, height)
}

/// Production normalizer: Triangle resampling, JPEG output.
#[derive(Debug, Clone)]
pub struct JpegNormalizer {
    max_dimension: u32,
    quality: u8,
}

impl JpegNormalizer {
    pub fn new() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            quality: (JPEG_QUALITY * 100.0).round() as u8,
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Encoder quality on the 1-100 scale.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageNormalizer for JpegNormalizer {
    fn normalize(&self, image_bytes: &[u8]) -> Result<NormalizedImage, MediaError> {
        if image_bytes.is_empty() {
            return Err(MediaError::Decode("attachment is empty".to_string()));
        }

        let img = image::load_from_memory(image_bytes)
            .map_err(|e| MediaError::Decode(e.to_string()))?;
        let (original_width, original_height) = img.dimensions();
        if original_width == 0 || original_height == 0 {
            return Err(MediaError::Render(format!(
                "cannot create a {}x{} surface",
                original_width, original_height
            )));
        }

        let (width, height) = target_dimensions(original_width, original_height, self.max_dimension);
        let resized = if (width, height) == (original_width, original_height) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Triangle)
        };

        // JPEG has no alpha channel
        let rgb = resized.to_rgb8();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.quality)
            .encode_image(&rgb)
            .map_err(|e| MediaError::Render(e.to_string()))?;

        tracing::debug!(
            original = format!("{}x{}", original_width, original_height),
            output = format!("{}x{}", width, height),
            input_len = image_bytes.len(),
            jpeg_len = encoded.len(),
            "Attachment normalized"
        );

        Ok(NormalizedImage {
            data_url: encode_data_url(OUTPUT_MIME, &encoded),
            original_width,
            original_height,
            width,
            height,
            encoded_len: encoded.len(),
        })
    }
}
