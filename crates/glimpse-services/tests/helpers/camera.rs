//! Camera double tracking how many streams are open.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use glimpse_core::AppError;
use glimpse_services::{CameraDevice, CameraStream, Frame};

#[derive(Clone, Default)]
pub struct TestCamera {
    open: Arc<AtomicUsize>,
}

impl TestCamera {
    /// Streams acquired and not yet released.
    pub fn open_streams(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

struct TestStream {
    open: Arc<AtomicUsize>,
}

#[async_trait]
impl CameraDevice for TestCamera {
    async fn acquire(&self) -> Result<Box<dyn CameraStream>, AppError> {
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestStream {
            open: self.open.clone(),
        }))
    }
}

impl CameraStream for TestStream {
    fn snapshot(&mut self) -> Result<Frame, AppError> {
        Ok(Frame::from_pixel(16, 9, image::Rgb([250, 180, 40])))
    }

    fn release(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
