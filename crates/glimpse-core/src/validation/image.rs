//! Image file checks run before any network call.

use crate::error::AppError;
use crate::models::ImageFile;

pub const NOT_AN_IMAGE_MESSAGE: &str = "Please upload an image file";
pub const NOT_AN_IMAGE_SELECTION_MESSAGE: &str = "Please select an image file";

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// True when the declared type is in the `image/*` family.
pub fn is_image_content_type(content_type: &str) -> bool {
    normalize_mime_type(content_type).starts_with("image/")
}

/// Rejection message for a file over `max_size_bytes`, in whole megabytes
/// when the limit is one.
pub fn image_too_large_message(max_size_bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if max_size_bytes % MB == 0 {
        format!("Image size should be less than {}MB", max_size_bytes / MB)
    } else {
        format!(
            "Image size should be less than {}KB",
            max_size_bytes.div_ceil(1024)
        )
    }
}

/// Validate size and declared type of a file about to be uploaded.
pub fn validate_image_file(file: &ImageFile, max_size_bytes: usize) -> Result<(), AppError> {
    if file.size() > max_size_bytes {
        return Err(AppError::Validation(image_too_large_message(max_size_bytes)));
    }
    if !is_image_content_type(&file.content_type) {
        return Err(AppError::Validation(NOT_AN_IMAGE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Validate a file at the moment it is picked, before it becomes the
/// pending image of a capture.
pub fn validate_image_selection(file: &ImageFile) -> Result<(), AppError> {
    if !is_image_content_type(&file.content_type) {
        return Err(AppError::Validation(
            NOT_AN_IMAGE_SELECTION_MESSAGE.to_string(),
        ));
    }
    Ok(())
}

/// Expected content type for an image file extension.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

/// File extension for an image content type.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match normalize_mime_type(content_type).as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        "image/heic" => Some("heic"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some("ico"),
        _ => None,
    }
}
