//! Glimpse Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! validation shared by every Glimpse component.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
