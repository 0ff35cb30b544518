//! Glimpse Services Layer
//!
//! The user-facing flows of the stories feature: image upload, story
//! capture and publishing, the 24-hour feed, the story viewer and the
//! profile editor. Flows take their dependencies as trait objects
//! (`Storage`, `StoryRepository`, `ProfileRepository`, `CameraDevice`,
//! `Clock`); [`ServiceContext`] builds the production set from `Config`.

pub mod board;
pub mod capture;
pub mod context;
pub mod feed;
pub mod profile;
pub mod upload;
pub mod viewer;

#[cfg(test)]
mod test_helpers;

pub use board::StoryBoard;
pub use capture::{
    frame_to_jpeg, CameraDevice, CameraSession, CameraStream, CaptureFlow, CaptureState, Frame,
    StoryPublisher, STORY_CREATED_MESSAGE,
};
pub use context::ServiceContext;
pub use feed::FeedLoader;
pub use profile::{ProfileEditor, PROFILE_UPDATED_MESSAGE};
pub use upload::{ImageUploader, UploadTarget, UploadedImage};
pub use viewer::{StoryView, StoryViewer};
