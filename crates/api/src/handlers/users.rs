//! Handlers for the `/users` resource.
//!
//! Every handler is authenticated; the caller's username comes from the
//! bearer token and scopes all write operations to their own profile.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use rendezvous_core::directory::MemberParams;
use rendezvous_core::media::ImageUpload;
use rendezvous_core::profile::ProfilePatch;
use rendezvous_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{pagination_header, DataResponse};
use crate::services::{directory, profile};
use crate::state::AppState;

/// Multipart field carrying the photo.
const PHOTO_FIELD: &str = "file";

/* --------------------------------------------------------------------------
   Directory
   -------------------------------------------------------------------------- */

/// GET /api/v1/users
///
/// Paginated member listing. Metadata is returned in the `Pagination` header.
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MemberParams>,
) -> AppResult<impl IntoResponse> {
    let page = directory::list_members(
        &state.pool,
        state.counterpart.as_ref(),
        &auth.username,
        &params,
    )
    .await?;

    let header = pagination_header(&page.header())?;
    Ok(([header], Json(DataResponse { data: page.items })))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let member = directory::get_member(&state.pool, &username).await?;
    Ok(Json(DataResponse { data: member }))
}

/// PUT /api/v1/users
///
/// Update the caller's own profile fields.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(patch): Json<ProfilePatch>,
) -> AppResult<StatusCode> {
    profile::update_profile(&state.pool, &auth.username, &patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
   Photos
   -------------------------------------------------------------------------- */

/// POST /api/v1/users/add-photo
///
/// Accepts a multipart form with a required `file` field. Returns 201 with a
/// `Location` pointing at the caller's profile.
pub async fn add_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let upload = read_photo_field(multipart).await?;
    let photo = state.gallery.add_photo(&auth.username, upload).await?;

    let location = HeaderValue::from_str(&format!("/api/v1/users/{}", auth.username))
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: photo }),
    ))
}

/// PUT /api/v1/users/set-main-photo/{photo_id}
pub async fn set_main_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.gallery.set_main_photo(&auth.username, photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/delete-photo/{photo_id}
pub async fn delete_photo(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(photo_id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.gallery.delete_photo(&auth.username, photo_id).await?;
    Ok(StatusCode::OK)
}

async fn read_photo_field(mut multipart: Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue; // ignore unknown fields
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing required '{PHOTO_FIELD}' field"
    )))
}
