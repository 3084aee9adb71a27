//! Photo gallery lifecycle: add, promote, remove.
//!
//! Coordinates the media store with the database so that a member's gallery
//! always has exactly one main photo (or is empty). Held in
//! [`AppState`](crate::state::AppState) as an `Arc<PhotoGallery>`.

use std::sync::Arc;

use rendezvous_core::error::CoreError;
use rendezvous_core::gallery::{plan_delete, plan_set_main, upload_becomes_main};
use rendezvous_core::media::{ImageUpload, MediaStore, StoredImage};
use rendezvous_core::types::DbId;
use rendezvous_core::upload::validate_photo_bytes;
use rendezvous_db::models::photo::{CreatePhoto, Photo};
use rendezvous_db::repositories::{MemberRepo, PhotoRepo};
use rendezvous_db::unit_of_work::UnitOfWork;
use sqlx::PgPool;

use crate::error::{persistence, AppResult};

const ADD_FAILED: &str = "Problem adding photo";
const SET_MAIN_FAILED: &str = "Problem setting main photo";
const DELETE_FAILED: &str = "Problem deleting photo";

pub struct PhotoGallery {
    pool: PgPool,
    media: Arc<dyn MediaStore>,
    max_upload_bytes: usize,
}

impl PhotoGallery {
    pub fn new(pool: PgPool, media: Arc<dyn MediaStore>, max_upload_bytes: usize) -> Self {
        Self {
            pool,
            media,
            max_upload_bytes,
        }
    }

    /// Name of the configured media backend.
    pub fn media_backend(&self) -> &'static str {
        self.media.backend()
    }

    /// Upload a photo and append it to `username`'s gallery.
    ///
    /// The first photo in an empty gallery becomes main. If the upload
    /// succeeds but recording it fails, the asset stays in the media store
    /// and is logged as orphaned.
    pub async fn add_photo(&self, username: &str, mut upload: ImageUpload) -> AppResult<Photo> {
        if MemberRepo::find_by_username(&self.pool, username)
            .await?
            .is_none()
        {
            return Err(CoreError::member_not_found(username).into());
        }

        let content_type = validate_photo_bytes(&upload.bytes, self.max_upload_bytes)?;
        upload.content_type = content_type.to_string();

        let stored = self.media.upload(upload).await.map_err(|e| {
            tracing::warn!(username, backend = self.media.backend(), error = %e, "Photo upload failed");
            CoreError::from(e)
        })?;

        match self.record_upload(username, &stored).await {
            Ok(photo) => {
                tracing::info!(
                    username,
                    photo_id = photo.id,
                    is_main = photo.is_main,
                    "Photo added",
                );
                Ok(photo)
            }
            Err(err) => {
                tracing::warn!(
                    username,
                    public_id = %stored.public_id,
                    error = %err,
                    "Uploaded photo was not recorded; asset left in media store",
                );
                Err(err)
            }
        }
    }

    async fn record_upload(&self, username: &str, stored: &StoredImage) -> AppResult<Photo> {
        let mut uow = UnitOfWork::begin(&self.pool)
            .await
            .map_err(persistence(ADD_FAILED))?;

        let member = MemberRepo::lock_by_username(uow.conn(), username)
            .await
            .map_err(persistence(ADD_FAILED))?
            .ok_or_else(|| CoreError::member_not_found(username))?;

        // Decided under the row lock so two first uploads cannot both be main.
        let gallery = PhotoRepo::list_for_member(uow.conn(), member.id)
            .await
            .map_err(persistence(ADD_FAILED))?;

        let input = CreatePhoto {
            member_id: member.id,
            url: stored.url.clone(),
            public_id: Some(stored.public_id.clone()),
            is_main: upload_becomes_main(&gallery),
        };
        let photo = PhotoRepo::insert(uow.conn(), &input)
            .await
            .map_err(persistence(ADD_FAILED))?;

        uow.commit().await.map_err(persistence(ADD_FAILED))?;
        Ok(photo)
    }

    /// Make `photo_id` the main photo, demoting the current one.
    pub async fn set_main_photo(&self, username: &str, photo_id: DbId) -> AppResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool)
            .await
            .map_err(persistence(SET_MAIN_FAILED))?;

        let member = MemberRepo::lock_by_username(uow.conn(), username)
            .await
            .map_err(persistence(SET_MAIN_FAILED))?
            .ok_or_else(|| CoreError::member_not_found(username))?;

        let gallery = PhotoRepo::list_for_member(uow.conn(), member.id)
            .await
            .map_err(persistence(SET_MAIN_FAILED))?;

        let swap = plan_set_main(&gallery, photo_id)?;

        PhotoRepo::swap_main(uow.conn(), member.id, swap.demote, swap.promote)
            .await
            .map_err(persistence(SET_MAIN_FAILED))?;

        uow.commit().await.map_err(persistence(SET_MAIN_FAILED))?;

        tracing::info!(
            username,
            photo_id,
            demoted = swap.demote,
            "Main photo changed",
        );
        Ok(())
    }

    /// Remove a non-main photo, deleting its stored asset first.
    ///
    /// A media store failure aborts before any row is touched.
    pub async fn delete_photo(&self, username: &str, photo_id: DbId) -> AppResult<()> {
        let mut uow = UnitOfWork::begin(&self.pool)
            .await
            .map_err(persistence(DELETE_FAILED))?;

        let member = MemberRepo::lock_by_username(uow.conn(), username)
            .await
            .map_err(persistence(DELETE_FAILED))?
            .ok_or_else(|| CoreError::member_not_found(username))?;

        let gallery = PhotoRepo::list_for_member(uow.conn(), member.id)
            .await
            .map_err(persistence(DELETE_FAILED))?;

        let removal = plan_delete(&gallery, photo_id)?;

        // The member lock stays held across the provider call so the row
        // cannot change between the asset delete and the row delete.
        if let Some(public_id) = &removal.public_id {
            self.media.delete(public_id).await.map_err(|e| {
                tracing::warn!(
                    username,
                    photo_id,
                    public_id = %public_id,
                    error = %e,
                    "Photo asset delete failed",
                );
                CoreError::from(e)
            })?;
        }

        PhotoRepo::delete(uow.conn(), member.id, removal.photo_id)
            .await
            .map_err(persistence(DELETE_FAILED))?;

        uow.commit().await.map_err(persistence(DELETE_FAILED))?;

        tracing::info!(username, photo_id, "Photo deleted");
        Ok(())
    }
}
