use glimpse_storage::keys;

/// Where and how an image is uploaded, plus the notification texts that are
/// specific to the destination.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub bucket: String,
    /// Overwrite an object at the same path instead of failing.
    pub upsert: bool,
    object_path: fn(&str) -> String,
    bucket_missing_message: &'static str,
    service_unavailable_message: &'static str,
}

impl UploadTarget {
    /// Story images: `stories/<token>.<ext>`, never overwritten.
    pub fn story(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            upsert: false,
            object_path: keys::story_object_path,
            bucket_missing_message: "Story upload is not available. Please try again later.",
            service_unavailable_message:
                "Story upload service is unavailable. Please try again later.",
        }
    }

    /// Avatars: `<token>.<ext>`, uploaded with upsert.
    pub fn avatar(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            upsert: true,
            object_path: keys::avatar_object_path,
            bucket_missing_message: "Image upload is not configured. Please try again later.",
            service_unavailable_message:
                "Image upload service is not available. Please try again later.",
        }
    }

    pub fn object_path(&self, extension: &str) -> String {
        (self.object_path)(extension)
    }

    /// Shown when the bucket lookup says the bucket does not exist.
    pub fn bucket_missing_message(&self) -> &'static str {
        self.bucket_missing_message
    }

    /// Shown when the store rejects the upload because the bucket is gone.
    pub fn service_unavailable_message(&self) -> &'static str {
        self.service_unavailable_message
    }
}

/// A stored image and its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub bucket: String,
    pub path: String,
    pub url: String,
}
