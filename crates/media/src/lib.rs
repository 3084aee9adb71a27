//! Media store adapters.
//!
//! Implementations of [`rendezvous_core::media::MediaStore`]:
//!
//! - [`cloudinary::CloudinaryStore`] uploads to Cloudinary over its signed
//!   REST API.
//! - [`local::LocalMediaStore`] writes to a directory served by the API
//!   itself, for development and tests.

pub mod cloudinary;
pub mod local;

pub use cloudinary::{CloudinaryConfig, CloudinaryStore};
pub use local::LocalMediaStore;
