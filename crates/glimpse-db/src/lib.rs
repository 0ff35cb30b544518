//! Glimpse record repositories
//!
//! Stories and profiles live in the hosted record service. The services
//! layer only sees the [`StoryRepository`] and [`ProfileRepository`] traits;
//! the `rest` module talks to the record service, the `memory` module keeps
//! rows in process for tests and offline runs.

pub mod memory;
pub mod repository;
pub mod rest;

pub use memory::{InMemoryProfileRepository, InMemoryStoryRepository};
pub use repository::{ProfileRepository, StoryRepository};
pub use rest::{RestProfileRepository, RestStoryRepository};
