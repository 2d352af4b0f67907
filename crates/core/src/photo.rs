//! Uploaded photo validation and decoding.
//!
//! The acceptance check is deliberately shallow: file extension plus declared
//! byte length, nothing else. The extension can lie; this mirrors the
//! long-standing behaviour of the issuance workflow and is a known
//! limitation, not something to quietly strengthen with content sniffing.

use std::path::Path;

use image::DynamicImage;

use crate::error::CoreError;

/// Photo file extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Maximum accepted photo size: 5 MiB. A photo of exactly this size passes.
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

/// Validate an uploaded photo by file extension and declared length.
pub fn validate_upload(filename: &str, declared_len: u64) -> Result<(), CoreError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            CoreError::Validation(format!("Photo '{filename}' has no file extension"))
        })?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CoreError::Validation(format!(
            "Photo extension '.{extension}' is not allowed. Accepted: {ALLOWED_EXTENSIONS:?}"
        )));
    }

    if declared_len > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation(format!(
            "Photo is {declared_len} bytes, above the {MAX_PHOTO_BYTES} byte limit"
        )));
    }

    Ok(())
}

/// Decode photo bytes into a raster image.
///
/// A photo that decodes to zero width or height is rejected here so the
/// composer's aspect-ratio division can never be undefined.
pub fn decode_photo(bytes: &[u8]) -> Result<DynamicImage, CoreError> {
    let photo = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Validation(format!("Photo could not be decoded: {e}")))?;

    if photo.width() == 0 || photo.height() == 0 {
        return Err(CoreError::Validation(
            "Photo has zero width or height".to_string(),
        ));
    }

    Ok(photo)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- extension tests --

    #[test]
    fn accepts_allowed_extensions() {
        for name in &["a.jpg", "a.jpeg", "a.png"] {
            assert!(validate_upload(name, 100).is_ok(), "name: {name}");
        }
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(validate_upload("photo.JPG", 100).is_ok());
        assert!(validate_upload("photo.Png", 100).is_ok());
    }

    #[test]
    fn rejects_disallowed_extensions() {
        for name in &["a.gif", "a.bmp", "a.webp", "a.pdf", "a.jpg.exe"] {
            assert!(validate_upload(name, 100).is_err(), "name: {name}");
        }
    }

    #[test]
    fn rejects_missing_extension() {
        assert!(validate_upload("photo", 100).is_err());
    }

    // -- size boundary tests --

    #[test]
    fn exactly_five_mib_passes() {
        assert!(validate_upload("a.jpg", MAX_PHOTO_BYTES).is_ok());
    }

    #[test]
    fn one_byte_over_five_mib_fails() {
        let err = validate_upload("a.jpg", MAX_PHOTO_BYTES + 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    // -- decode tests --

    #[test]
    fn garbage_bytes_fail_decode() {
        let err = decode_photo(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn decodes_generated_png() {
        let img = image::RgbImage::new(8, 6);
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        let decoded = decode_photo(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }
}
