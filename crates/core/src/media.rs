//! Port for the external image store.
//!
//! Implementations live in `rendezvous-media` (Cloudinary, local disk).
//! Each call is a single attempt; callers abort the enclosing operation on
//! error rather than retrying.

use async_trait::async_trait;

use crate::error::CoreError;

/// Binary photo payload handed to [`MediaStore::upload`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Location of a successfully stored asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL the client renders.
    pub url: String,
    /// Opaque provider handle used for deletion.
    pub public_id: String,
}

/// Errors reported by a media store backend.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The provider rejected the request; `message` is shown to the caller.
    #[error("{message}")]
    Rejected { message: String },

    /// The provider could not be reached or returned garbage.
    #[error("Media store unavailable: {0}")]
    Transport(String),

    #[error("Media store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaError> for CoreError {
    fn from(err: MediaError) -> Self {
        CoreError::ExternalStore(err.to_string())
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short backend name for logs (`"cloudinary"`, `"local"`).
    fn backend(&self) -> &'static str;

    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, MediaError>;

    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}
