//! Domain logic for the Rendezvous member directory.
//!
//! This crate has no I/O of its own: it holds the types, error taxonomy,
//! directory filtering rules, pagination maths, photo-gallery planning and
//! the [`media::MediaStore`] port that the db, media and api crates build on.

pub mod directory;
pub mod error;
pub mod gallery;
pub mod gender;
pub mod media;
pub mod pagination;
pub mod profile;
pub mod types;
pub mod upload;
