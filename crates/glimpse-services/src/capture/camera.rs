//! Camera access.
//!
//! A [`CameraDevice`] hands out exclusive [`CameraStream`]s. Streams are held
//! through a [`CameraSession`], which releases the device when dropped, so
//! every exit path of the capture flow gives the camera back.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use glimpse_core::constants::CAMERA_CAPTURE_FILENAME;
use glimpse_core::models::ImageFile;
use glimpse_core::AppError;
use image::{DynamicImage, ImageFormat, RgbImage};

/// A single video frame.
pub type Frame = RgbImage;

/// Source of live video.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Open the device for exclusive use.
    ///
    /// Fails with [`AppError::Camera`] when the device is missing, busy or
    /// access is denied.
    async fn acquire(&self) -> Result<Box<dyn CameraStream>, AppError>;
}

/// An open video stream.
pub trait CameraStream: Send {
    /// Grab the current frame.
    fn snapshot(&mut self) -> Result<Frame, AppError>;

    /// Stop the stream and give the device back. Called exactly once.
    fn release(&mut self);
}

/// Scoped ownership of an open camera stream.
pub struct CameraSession {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraSession {
    pub async fn open(device: &Arc<dyn CameraDevice>) -> Result<Self, AppError> {
        let stream = device.acquire().await?;
        tracing::debug!("Camera acquired");
        Ok(Self {
            stream: Some(stream),
        })
    }

    pub fn snapshot(&mut self) -> Result<Frame, AppError> {
        match self.stream.as_mut() {
            Some(stream) => stream.snapshot(),
            None => Err(AppError::Camera("Camera stream already released".to_string())),
        }
    }

    /// Release the camera now instead of at drop.
    pub fn release(mut self) {
        self.release_stream();
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            tracing::debug!("Camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release_stream();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("active", &self.stream.is_some())
            .finish()
    }
}

/// Encode a frame as the JPEG file a camera capture produces.
pub fn frame_to_jpeg(frame: Frame) -> Result<ImageFile, AppError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(AppError::Camera("Captured frame is empty".to_string()));
    }

    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(frame)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(|e| AppError::Camera(format!("Failed to encode frame: {}", e)))?;

    Ok(ImageFile::new(
        CAMERA_CAPTURE_FILENAME,
        "image/jpeg",
        Bytes::from(buf),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::CountingCamera;

    #[tokio::test]
    async fn dropping_a_session_releases_the_device() {
        let camera = CountingCamera::new();
        let device: Arc<dyn CameraDevice> = Arc::new(camera.clone());

        {
            let _session = CameraSession::open(&device).await.unwrap();
            assert_eq!(camera.active(), 1);
        }

        assert_eq!(camera.acquired(), 1);
        assert_eq!(camera.released(), 1);
    }

    #[tokio::test]
    async fn explicit_release_happens_once() {
        let camera = CountingCamera::new();
        let device: Arc<dyn CameraDevice> = Arc::new(camera.clone());

        let session = CameraSession::open(&device).await.unwrap();
        session.release();

        assert_eq!(camera.released(), 1);
        assert_eq!(camera.active(), 0);
    }

    #[test]
    fn frames_encode_to_jpeg() {
        let frame = RgbImage::from_pixel(4, 3, image::Rgb([200, 10, 10]));
        let file = frame_to_jpeg(frame).unwrap();

        assert_eq!(file.file_name, "camera-capture.jpg");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(&file.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn empty_frame_is_a_camera_error() {
        let err = frame_to_jpeg(RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, AppError::Camera(_)));
    }
}
