//! Photo gallery rules.
//!
//! A member's gallery is either empty or has exactly one main photo. The
//! planners here inspect the current gallery and decide what a mutation
//! must do (or reject it) without touching storage; the api crate applies
//! the plan inside a single unit of work.
//!
//! Photo states: uploaded-non-main -> main (first upload or promotion) ->
//! removed. A main photo can never be removed directly.

use crate::error::CoreError;
use crate::types::DbId;

pub const ALREADY_MAIN: &str = "Already main photo";
pub const CANNOT_DELETE_MAIN: &str = "Can't delete main photo";

/// Read access to a stored photo, implemented by the db model.
pub trait GalleryEntry {
    fn photo_id(&self) -> DbId;
    fn is_main(&self) -> bool;
    /// External storage identifier; `None` for seed photos.
    fn public_id(&self) -> Option<&str>;
}

/// Whether a photo uploaded into `gallery` becomes the main photo.
pub fn upload_becomes_main<P: GalleryEntry>(gallery: &[P]) -> bool {
    gallery.is_empty()
}

/// Demote/promote pair produced by [`plan_set_main`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainSwap {
    /// Current main photo, if the gallery has one.
    pub demote: Option<DbId>,
    pub promote: DbId,
}

/// Plan promoting `photo_id` to main.
pub fn plan_set_main<P: GalleryEntry>(gallery: &[P], photo_id: DbId) -> Result<MainSwap, CoreError> {
    let target = find(gallery, photo_id)?;
    if target.is_main() {
        return Err(CoreError::InvariantViolation(ALREADY_MAIN.into()));
    }

    let demote = gallery.iter().find(|p| p.is_main()).map(|p| p.photo_id());
    Ok(MainSwap {
        demote,
        promote: photo_id,
    })
}

/// What [`plan_delete`] decided to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRemoval {
    pub photo_id: DbId,
    /// When set, the asset must be deleted from the media store before the
    /// row is removed.
    pub public_id: Option<String>,
}

/// Plan removing `photo_id`. The main photo is never removable.
pub fn plan_delete<P: GalleryEntry>(gallery: &[P], photo_id: DbId) -> Result<PhotoRemoval, CoreError> {
    let target = find(gallery, photo_id)?;
    if target.is_main() {
        return Err(CoreError::InvariantViolation(CANNOT_DELETE_MAIN.into()));
    }

    Ok(PhotoRemoval {
        photo_id,
        public_id: target.public_id().map(str::to_string),
    })
}

/// `true` when the gallery is empty with no main, or non-empty with
/// exactly one main.
pub fn has_single_main<P: GalleryEntry>(gallery: &[P]) -> bool {
    let mains = gallery.iter().filter(|p| p.is_main()).count();
    if gallery.is_empty() {
        mains == 0
    } else {
        mains == 1
    }
}

fn find<P: GalleryEntry>(gallery: &[P], photo_id: DbId) -> Result<&P, CoreError> {
    gallery
        .iter()
        .find(|p| p.photo_id() == photo_id)
        .ok_or_else(|| CoreError::photo_not_found(photo_id))
}
