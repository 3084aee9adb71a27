//! Photo entity model and DTOs.

use rendezvous_core::gallery::GalleryEntry;
use rendezvous_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub member_id: DbId,
    pub url: String,
    /// Provider handle; not exposed to clients.
    #[serde(skip_serializing)]
    pub public_id: Option<String>,
    pub is_main: bool,
    pub created_at: Timestamp,
}

impl GalleryEntry for Photo {
    fn photo_id(&self) -> DbId {
        self.id
    }

    fn is_main(&self) -> bool {
        self.is_main
    }

    fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }
}

/// DTO for inserting a photo after a successful upload.
#[derive(Debug, Clone)]
pub struct CreatePhoto {
    pub member_id: DbId,
    pub url: String,
    pub public_id: Option<String>,
    pub is_main: bool,
}
