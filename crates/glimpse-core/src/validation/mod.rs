//! Validation modules

pub mod caption;
pub mod image;

pub use caption::normalize_caption;
pub use image::{
    content_type_for_extension, extension_for_content_type, image_too_large_message,
    is_image_content_type, validate_image_file, validate_image_selection, NOT_AN_IMAGE_MESSAGE,
    NOT_AN_IMAGE_SELECTION_MESSAGE,
};
