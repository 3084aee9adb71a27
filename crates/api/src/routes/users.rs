//! Route definitions for the member directory and photo gallery.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                               list_users
/// PUT    /                               update_user
/// GET    /{username}                     get_user
/// POST   /add-photo                      add_photo (multipart)
/// PUT    /set-main-photo/{photo_id}      set_main_photo
/// DELETE /delete-photo/{photo_id}        delete_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).put(users::update_user))
        .route("/add-photo", post(users::add_photo))
        .route("/set-main-photo/{photo_id}", put(users::set_main_photo))
        .route("/delete-photo/{photo_id}", delete(users::delete_photo))
        .route("/{username}", get(users::get_user))
}
