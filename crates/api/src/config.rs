use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rendezvous_core::media::{MediaError, MediaStore};
use rendezvous_core::upload::DEFAULT_MAX_UPLOAD_BYTES;
use rendezvous_media::{CloudinaryConfig, CloudinaryStore, LocalMediaStore};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted photo upload in bytes.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
}

/// Which media store backs the photo gallery.
#[derive(Debug, Clone)]
pub enum MediaConfig {
    /// Files on local disk, served by this server under `/photos`.
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    Cloudinary(CloudinaryConfig),
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:4200` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`              |
    ///
    /// See [`MediaConfig::from_env`] for the media variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:4200".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}

impl MediaConfig {
    /// Load media configuration from environment variables.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `MEDIA_BACKEND`         | `local`                        |
    /// | `MEDIA_LOCAL_ROOT`      | `storage/photos`               |
    /// | `MEDIA_PUBLIC_BASE_URL` | `http://localhost:3000/photos` |
    /// | `CLOUDINARY_CLOUD_NAME` | required for `cloudinary`      |
    /// | `CLOUDINARY_API_KEY`    | required for `cloudinary`      |
    /// | `CLOUDINARY_API_SECRET` | required for `cloudinary`      |
    /// | `CLOUDINARY_FOLDER`     | none                           |
    /// | `MEDIA_TIMEOUT_SECS`    | `20`                           |
    pub fn from_env() -> Self {
        let backend = std::env::var("MEDIA_BACKEND").unwrap_or_else(|_| "local".into());

        match backend.as_str() {
            "local" => Self::Local {
                root: std::env::var("MEDIA_LOCAL_ROOT")
                    .unwrap_or_else(|_| "storage/photos".into())
                    .into(),
                public_base_url: std::env::var("MEDIA_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/photos".into()),
            },
            "cloudinary" => {
                let timeout_secs: u64 = std::env::var("MEDIA_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "20".into())
                    .parse()
                    .expect("MEDIA_TIMEOUT_SECS must be a valid u64");

                Self::Cloudinary(CloudinaryConfig {
                    cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME")
                        .expect("CLOUDINARY_CLOUD_NAME must be set for the cloudinary backend"),
                    api_key: std::env::var("CLOUDINARY_API_KEY")
                        .expect("CLOUDINARY_API_KEY must be set for the cloudinary backend"),
                    api_secret: std::env::var("CLOUDINARY_API_SECRET")
                        .expect("CLOUDINARY_API_SECRET must be set for the cloudinary backend"),
                    folder: std::env::var("CLOUDINARY_FOLDER").ok(),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            other => panic!("Unknown MEDIA_BACKEND '{other}'. Must be one of: local, cloudinary"),
        }
    }

    /// Construct the configured store.
    pub fn build_store(&self) -> Result<Arc<dyn MediaStore>, MediaError> {
        match self {
            Self::Local {
                root,
                public_base_url,
            } => Ok(Arc::new(LocalMediaStore::new(root.clone(), public_base_url.clone()))),
            Self::Cloudinary(config) => Ok(Arc::new(CloudinaryStore::new(config.clone())?)),
        }
    }
}
