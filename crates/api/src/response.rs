//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paginated listings
//! keep the body a plain list and carry their metadata in the
//! [`PAGINATION_HEADER`].

use axum::http::{HeaderName, HeaderValue};
use rendezvous_core::pagination::PaginationHeader;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Response header carrying JSON-encoded [`PaginationHeader`] metadata.
pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("pagination");

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Encode pagination metadata as a header pair.
pub fn pagination_header(meta: &PaginationHeader) -> AppResult<(HeaderName, HeaderValue)> {
    let json = serde_json::to_string(meta).map_err(|e| AppError::InternalError(e.to_string()))?;
    let value = HeaderValue::from_str(&json).map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok((PAGINATION_HEADER, value))
}
