//! Story capture: pick a file or snapshot the camera, then publish.

mod camera;
mod flow;
mod publisher;

pub use camera::{frame_to_jpeg, CameraDevice, CameraSession, CameraStream, Frame};
pub use flow::{CaptureFlow, CaptureState};
pub use publisher::{StoryPublisher, STORY_CREATED_MESSAGE};
