//! Request-scoped operations behind the `/users` handlers.
//!
//! Every operation takes the caller's username explicitly. Write paths run
//! inside a [`UnitOfWork`](rendezvous_db::unit_of_work::UnitOfWork) and lock
//! the member row first, so writes to one member are serialized.

pub mod directory;
pub mod gallery;
pub mod profile;

pub use gallery::PhotoGallery;
