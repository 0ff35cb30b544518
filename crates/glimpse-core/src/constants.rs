//! Limits and names shared by the upload, capture and feed flows.

use chrono::Duration;

/// Largest image accepted by the upload adapter, in megabytes.
pub const MAX_IMAGE_SIZE_MB: usize = 5;

/// Longest caption a story may carry, in characters.
pub const MAX_CAPTION_CHARS: usize = 100;

/// How long a story stays in the feed after creation.
pub const STORY_VISIBILITY_HOURS: i64 = 24;

pub const DEFAULT_STORY_BUCKET: &str = "media";
pub const DEFAULT_AVATAR_BUCKET: &str = "avatars";

/// Folder inside the story bucket that holds story images.
pub const STORY_OBJECT_PREFIX: &str = "stories";

/// `cache-control` max-age, in seconds, sent with every upload.
pub const UPLOAD_CACHE_CONTROL_SECS: u32 = 3600;

/// File name given to frames captured from the camera.
pub const CAMERA_CAPTURE_FILENAME: &str = "camera-capture.jpg";

/// Display name used when a story's owner has no username.
pub const UNKNOWN_USERNAME: &str = "Unknown";

pub fn story_visibility_window() -> Duration {
    Duration::hours(STORY_VISIBILITY_HOURS)
}
