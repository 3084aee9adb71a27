//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the create DTO and response shapes built from it.

pub mod member;
pub mod photo;
