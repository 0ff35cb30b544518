//! Glimpse Storage Library
//!
//! This crate provides the object storage abstraction used by the image
//! upload flow, with a backend for the hosted storage service and one for
//! the local filesystem.
//!
//! # Object layout
//!
//! Objects are addressed by `(bucket, path)`. Story images live under
//! `stories/{token}.{ext}` in the story bucket; avatars at `{token}.{ext}`
//! in the avatar bucket. Paths must not contain `..` or a leading `/`.
//! Path generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use glimpse_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult, UploadOptions};
