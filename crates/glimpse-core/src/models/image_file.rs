use std::path::Path;

use bytes::Bytes;

use crate::error::AppError;
use crate::validation::{content_type_for_extension, extension_for_content_type};

/// An image picked by the user or snapshotted from the camera, not yet
/// uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    /// Declared MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, declaring its type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, AppError> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::Validation(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(content_type_for_extension)
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self::new(file_name, content_type, data))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Extension used for the stored object name: the text after the last
    /// dot, or one derived from the content type when the name has none.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
            _ => extension_for_content_type(&self.content_type)
                .unwrap_or("bin")
                .to_string(),
        }
    }
}
