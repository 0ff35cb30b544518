//! Shared image upload used by story creation and the profile editor.

mod service;
mod types;

pub use service::{ImageUploader, NO_PATH_RETURNED_MESSAGE};
pub use types::{UploadTarget, UploadedImage};
