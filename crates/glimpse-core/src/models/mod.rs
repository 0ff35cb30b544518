//! Data models for the application
//!
//! Records exchanged with the hosted record service, plus the transient
//! values passed between flows.

mod image_file;
mod profile;
mod session;
mod story;

pub use image_file::*;
pub use profile::*;
pub use session::*;
pub use story::*;
