use std::sync::Arc;

use rendezvous_core::gender::{BinaryCounterpart, CounterpartPolicy};
use rendezvous_core::media::MediaStore;

use crate::config::ServerConfig;
use crate::services::PhotoGallery;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rendezvous_db::DbPool,
    /// Server configuration (read by the auth extractor and the router).
    pub config: Arc<ServerConfig>,
    /// Photo lifecycle manager, owning the media store handle.
    pub gallery: Arc<PhotoGallery>,
    /// Default gender filter for directory listings.
    pub counterpart: Arc<dyn CounterpartPolicy>,
}

impl AppState {
    pub fn new(
        pool: rendezvous_db::DbPool,
        config: Arc<ServerConfig>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let gallery = Arc::new(PhotoGallery::new(
            pool.clone(),
            media,
            config.max_upload_bytes,
        ));
        Self {
            pool,
            config,
            gallery,
            counterpart: Arc::new(BinaryCounterpart),
        }
    }
}
