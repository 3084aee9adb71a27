//! Filesystem-backed media store.
//!
//! Files are written under `root` with a generated name that doubles as the
//! public id; the API serves `root` at `public_base_url`.

use std::path::PathBuf;

use async_trait::async_trait;
use rendezvous_core::media::{ImageUpload, MediaError, MediaStore, StoredImage};

pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a public id to a path inside `root`, rejecting anything that
    /// could escape it.
    fn path_for(&self, public_id: &str) -> Result<PathBuf, MediaError> {
        let valid = !public_id.is_empty()
            && public_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !public_id.contains("..");
        if !valid {
            return Err(MediaError::Rejected {
                message: format!("Invalid public id '{public_id}'"),
            });
        }
        Ok(self.root.join(public_id))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, MediaError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let public_id = format!(
            "{}.{}",
            uuid::Uuid::now_v7().simple(),
            extension_for(&image.content_type)
        );
        let path = self.path_for(&public_id)?;
        tokio::fs::write(&path, &image.bytes).await?;

        tracing::debug!(public_id = %public_id, path = %path.display(), "Stored photo locally");

        Ok(StoredImage {
            url: format!("{}/{public_id}", self.public_base_url),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let path = self.path_for(public_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(public_id, "Local photo asset already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn upload_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:3000/photos/");

        let stored = store.upload(upload(b"png-bytes")).await.unwrap();

        assert!(stored.public_id.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:3000/photos/{}", stored.public_id)
        );
        let written = std::fs::read(dir.path().join(&stored.public_id)).unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost/photos");

        let stored = store.upload(upload(b"x")).await.unwrap();
        store.delete(&stored.public_id).await.unwrap();

        assert!(!dir.path().join(&stored.public_id).exists());
    }

    #[tokio::test]
    async fn delete_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost/photos");
        assert!(store.delete("0190abcd.png").await.is_ok());
    }

    #[tokio::test]
    async fn delete_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost/photos");
        let err = store.delete("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, MediaError::Rejected { .. }));
    }
}
