pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                  list members, update own profile
/// /users/{username}                       member detail
/// /users/add-photo                        upload a photo (multipart)
/// /users/set-main-photo/{photo_id}        promote a photo to main
/// /users/delete-photo/{photo_id}          remove a non-main photo
/// ```
///
/// All routes require `Authorization: Bearer <token>`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/users", users::router())
}
