//! Cloudinary image store.
//!
//! Wraps the signed upload and destroy endpoints of the Cloudinary REST API
//! using [`reqwest`]. Requests are signed with SHA-256 over the sorted
//! parameter string followed by the API secret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use rendezvous_core::media::{ImageUpload, MediaError, MediaStore, StoredImage};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Production API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Square crop centred on the detected face, matching the profile cards.
pub const PROFILE_TRANSFORMATION: &str = "c_fill,g_face,h_500,w_500";

/// Credentials and options for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Optional folder prefix for uploaded assets.
    pub folder: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for one Cloudinary cloud.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            config,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (e.g. a local stub).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sign `params`: sort by key, join as `k=v&k=v`, append the secret and
    /// hash. Empty values are skipped, as Cloudinary does.
    fn sign(&self, params: &[(&str, String)]) -> String {
        signature(params, &self.config.api_secret)
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.config.cloud_name)
    }

    /// Append the authentication fields shared by every signed request.
    fn signed_form(&self, mut form: Form, params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&params);
        for (key, value) in params {
            form = form.text(key, value);
        }
        form.text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    /// Map a non-2xx response to [`MediaError::Rejected`], preferring the
    /// provider's own message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("Cloudinary returned {status}: {body}"));
        Err(MediaError::Rejected { message })
    }
}

/// Cloudinary request signature (SHA-256 variant).
pub fn signature(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let hash = Sha256::digest(format!("{joined}{api_secret}").as_bytes());
    format!("{hash:x}")
}

fn transport(err: reqwest::Error) -> MediaError {
    MediaError::Transport(err.to_string())
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn backend(&self) -> &'static str {
        "cloudinary"
    }

    async fn upload(&self, image: ImageUpload) -> Result<StoredImage, MediaError> {
        let mut params = vec![
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
            ("transformation", PROFILE_TRANSFORMATION.to_string()),
        ];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.clone()));
        }

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(transport)?;
        let form = self.signed_form(Form::new().part("file", part), params);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let body: UploadResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        tracing::debug!(public_id = %body.public_id, "Cloudinary upload complete");

        Ok(StoredImage {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let params = vec![
            ("public_id", public_id.to_string()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ];
        let form = self.signed_form(Form::new(), params);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let body: DestroyResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        match body.result.as_str() {
            "ok" => Ok(()),
            // Already gone is as good as deleted.
            "not found" => {
                tracing::warn!(public_id, "Cloudinary asset already absent");
                Ok(())
            }
            other => Err(MediaError::Rejected {
                message: format!("Cloudinary destroy returned '{other}'"),
            }),
        }
    }
}
