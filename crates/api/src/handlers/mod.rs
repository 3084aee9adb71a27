//! Request handlers.
//!
//! Handlers extract the caller and request data, delegate to
//! [`services`](crate::services) and map errors via [`AppError`](crate::error::AppError).

pub mod users;
