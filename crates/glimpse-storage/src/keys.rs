//! Shared object path generation for storage backends.
//!
//! Story images: `stories/{token}.{ext}`. Avatars: `{token}.{ext}`.
//! Tokens are random UUIDs, so unrelated uploads never share a path.

use glimpse_core::constants::STORY_OBJECT_PREFIX;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Random object name keeping the original extension.
pub fn generate_object_name(extension: &str) -> String {
    let token = Uuid::new_v4().simple();
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        token.to_string()
    } else {
        format!("{}.{}", token, extension.to_lowercase())
    }
}

/// Path of a new story image inside the story bucket.
pub fn story_object_path(extension: &str) -> String {
    format!("{}/{}", STORY_OBJECT_PREFIX, generate_object_name(extension))
}

/// Path of a new avatar inside the avatar bucket.
pub fn avatar_object_path(extension: &str) -> String {
    generate_object_name(extension)
}

/// Reject empty paths, absolute paths and path traversal.
pub fn validate_key(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if path.contains("..") || path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Percent-encode each segment of a path, keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn decode_path(encoded: &str) -> Option<String> {
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_are_unique_and_keep_extension() {
        let a = generate_object_name("JPG");
        let b = generate_object_name("jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert_eq!(a.len(), 32 + 4);
    }

    #[test]
    fn story_paths_live_under_stories_prefix() {
        let path = story_object_path("png");
        assert!(path.starts_with("stories/"));
        assert!(path.ends_with(".png"));
        assert!(!avatar_object_path("png").contains('/'));
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(validate_key("stories/a.jpg").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("a\\b").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn encoding_keeps_separators() {
        assert_eq!(encode_path("stories/my photo.jpg"), "stories/my%20photo.jpg");
        assert_eq!(
            decode_path("stories/my%20photo.jpg").as_deref(),
            Some("stories/my photo.jpg")
        );
    }
}
