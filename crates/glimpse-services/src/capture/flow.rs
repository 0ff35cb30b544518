//! State of the "create story" dialog.

use std::sync::Arc;

use glimpse_core::models::{ImageFile, Session, Story};
use glimpse_core::validation::{normalize_caption, validate_image_selection};
use glimpse_core::AppError;

use super::camera::{frame_to_jpeg, CameraDevice, CameraSession};
use super::publisher::StoryPublisher;

/// Where the dialog is between opening and submitting.
#[derive(Debug, Default)]
pub enum CaptureState {
    /// Nothing picked yet.
    #[default]
    Idle,
    /// The camera is live.
    Capturing(CameraSession),
    /// An image is waiting to be shared.
    Ready(ImageFile),
}

/// Picks or captures an image, collects a caption and submits the story.
///
/// The camera is only ever held inside [`CaptureState::Capturing`]; leaving
/// that state by any route drops the session and releases the device.
pub struct CaptureFlow {
    publisher: StoryPublisher,
    camera: Arc<dyn CameraDevice>,
    state: CaptureState,
    caption: String,
}

impl CaptureFlow {
    pub fn new(publisher: StoryPublisher, camera: Arc<dyn CameraDevice>) -> Self {
        Self {
            publisher,
            camera,
            state: CaptureState::Idle,
            caption: String::new(),
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::Capturing(_))
    }

    pub fn pending_image(&self) -> Option<&ImageFile> {
        match &self.state {
            CaptureState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// The caption as it will be stored.
    pub fn normalized_caption(&self) -> Option<String> {
        normalize_caption(&self.caption)
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Use a picked file as the pending image. Non-images are refused and
    /// leave the current state untouched.
    pub fn select_file(&mut self, file: ImageFile) -> Result<(), AppError> {
        validate_image_selection(&file)?;
        self.state = CaptureState::Ready(file);
        Ok(())
    }

    /// Open the camera. A no-op while it is already live.
    pub async fn start_camera(&mut self) -> Result<(), AppError> {
        if self.is_capturing() {
            return Ok(());
        }

        match CameraSession::open(&self.camera).await {
            Ok(session) => {
                self.state = CaptureState::Capturing(session);
                Ok(())
            }
            Err(e) => {
                e.log("Unable to access camera");
                Err(e)
            }
        }
    }

    /// Snapshot the live camera into the pending image and release it.
    ///
    /// On failure the camera stays live so the user can try again.
    pub fn capture_photo(&mut self) -> Result<(), AppError> {
        let mut session = match std::mem::take(&mut self.state) {
            CaptureState::Capturing(session) => session,
            other => {
                self.state = other;
                return Err(AppError::Camera("Camera is not active".to_string()));
            }
        };

        match session.snapshot().and_then(frame_to_jpeg) {
            Ok(image) => {
                session.release();
                tracing::debug!(size_bytes = image.size(), "Photo captured");
                self.state = CaptureState::Ready(image);
                Ok(())
            }
            Err(e) => {
                self.state = CaptureState::Capturing(session);
                Err(e)
            }
        }
    }

    /// Turn the camera off without capturing.
    pub fn stop_camera(&mut self) {
        if self.is_capturing() {
            self.state = CaptureState::Idle;
        }
    }

    /// Drop the pending image, keeping the caption.
    pub fn clear_image(&mut self) {
        if matches!(self.state, CaptureState::Ready(_)) {
            self.state = CaptureState::Idle;
        }
    }

    /// Dismiss the dialog: release the camera and forget image and caption.
    pub fn close(&mut self) {
        self.state = CaptureState::Idle;
        self.caption.clear();
    }

    /// Share the pending image as a story.
    ///
    /// Refused without a session or a pending image, leaving the dialog as
    /// it is. Once the upload starts, the image and caption are cleared
    /// whether or not it succeeds.
    pub async fn submit(&mut self, session: Option<&Session>) -> Result<Story, AppError> {
        if session.is_none() {
            return Err(AppError::NotAuthenticated);
        }
        if self.pending_image().is_none() {
            return Err(AppError::Validation(
                "Select or capture an image first".to_string(),
            ));
        }

        let image = match std::mem::take(&mut self.state) {
            CaptureState::Ready(image) => image,
            other => {
                self.state = other;
                return Err(AppError::Internal("Pending image disappeared".to_string()));
            }
        };
        let caption = std::mem::take(&mut self.caption);

        self.publisher.publish(session, &image, &caption).await
    }
}
