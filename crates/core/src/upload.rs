//! Validation for uploaded photo payloads.

use image::ImageFormat;

use crate::error::CoreError;

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Check size and sniff the image format from the header bytes.
///
/// Returns the MIME type of the detected format.
pub fn validate_photo_bytes(bytes: &[u8], max_bytes: usize) -> Result<&'static str, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "Uploaded file is {} bytes; the limit is {max_bytes}",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation("Uploaded file is not a recognized image".into()))?;

    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(CoreError::Validation(format!(
            "Unsupported image format {format:?}. Supported: JPEG, PNG, WebP, GIF"
        )));
    }

    Ok(format.to_mime_type())
}
