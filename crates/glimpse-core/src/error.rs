//! Error types module
//!
//! Every flow reports failures through [`AppError`]. Each variant maps to one
//! of the failure kinds a user can be told about; [`ErrorMetadata`] describes
//! how the error is presented (notification text, code, log level).

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for backend misconfiguration and rejected writes
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation
///
/// Errors self-describe the notification shown to the user and how they
/// should be logged.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error may be retried automatically
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Human-readable message for the transient notification
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Bad local input; raised before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    /// The target bucket is missing or the storage service refused it.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The store accepted the request but it could not be finalized.
    #[error("Upload error: {0}")]
    Upload(String),

    /// A record write failed.
    #[error("Persist error: {0}")]
    Persist(String),

    /// A record read failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AppError::Upload(_) => "UPLOAD_ERROR",
            AppError::Persist(_) => "PERSIST_ERROR",
            AppError::Fetch(_) => "FETCH_ERROR",
            AppError::Camera(_) => "CAMERA_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    // Nothing is retried automatically; the flow resets and the user decides.
    fn is_recoverable(&self) -> bool {
        false
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Validation(_) => Some("Choose a different image and try again"),
            AppError::NotAuthenticated => Some("Sign in and try again"),
            AppError::StorageUnavailable(_) | AppError::Config(_) => {
                Some("Contact the administrator of this project")
            }
            AppError::Upload(_) | AppError::Persist(_) | AppError::Fetch(_) => {
                Some("Try again later")
            }
            AppError::Camera(_) => Some("Allow camera access or pick a file instead"),
            AppError::NotFound(_) | AppError::Internal(_) => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::StorageUnavailable(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::NotAuthenticated => "You must be signed in to do that".to_string(),
            AppError::Upload(msg) if msg.is_empty() => "Error uploading image".to_string(),
            AppError::Upload(msg) => msg.clone(),
            AppError::Persist(msg) if msg.is_empty() => "Error creating story".to_string(),
            AppError::Persist(msg) => msg.clone(),
            AppError::Fetch(_) => "Could not load stories".to_string(),
            AppError::Camera(_) => "Unable to access camera".to_string(),
            AppError::Config(_) => "This feature is not configured".to_string(),
            AppError::Internal(_) => "Something went wrong".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) | AppError::NotFound(_) => LogLevel::Debug,
            AppError::NotAuthenticated
            | AppError::StorageUnavailable(_)
            | AppError::Persist(_)
            | AppError::Camera(_) => LogLevel::Warn,
            AppError::Upload(_)
            | AppError::Fetch(_)
            | AppError::Config(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl AppError {
    /// Emit this error through `tracing` at its own log level.
    pub fn log(&self, context: &str) {
        match self.log_level() {
            LogLevel::Debug => {
                tracing::debug!(code = self.error_code(), error = %self, "{}", context)
            }
            LogLevel::Warn => {
                tracing::warn!(code = self.error_code(), error = %self, "{}", context)
            }
            LogLevel::Error => {
                tracing::error!(code = self.error_code(), error = %self, "{}", context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = AppError::Validation("Image size should be less than 5MB".to_string());
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Image size should be less than 5MB");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_persist_falls_back_to_generic_message() {
        let err = AppError::Persist(String::new());
        assert_eq!(err.client_message(), "Error creating story");

        let err = AppError::Persist("duplicate key".to_string());
        assert_eq!(err.client_message(), "duplicate key");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_camera_hides_details() {
        let err = AppError::Camera("NotAllowedError: permission denied".to_string());
        assert_eq!(err.client_message(), "Unable to access camera");
        assert_eq!(err.error_code(), "CAMERA_ERROR");
    }

    #[test]
    fn test_no_error_is_recoverable() {
        let errors = [
            AppError::NotAuthenticated,
            AppError::StorageUnavailable("x".into()),
            AppError::Upload("x".into()),
            AppError::Persist("x".into()),
            AppError::Fetch("x".into()),
        ];
        assert!(errors.iter().all(|e| !e.is_recoverable()));
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        assert_eq!(
            AppError::NotAuthenticated.suggested_action(),
            Some("Sign in and try again")
        );
        assert_eq!(
            AppError::Upload("x".into()).suggested_action(),
            Some("Try again later")
        );
        assert_eq!(AppError::Internal("x".into()).suggested_action(), None);
    }

    #[test]
    fn anyhow_errors_become_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal(ref m) if m == "boom"));
    }
}
