#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Datelike, NaiveDate};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use rendezvous_api::auth::jwt::{generate_access_token, JwtConfig};
use rendezvous_api::config::{MediaConfig, ServerConfig};
use rendezvous_api::router::build_app_router;
use rendezvous_api::state::AppState;
use rendezvous_core::media::{ImageUpload, MediaError, MediaStore, StoredImage};
use rendezvous_db::models::member::{CreateMember, Member};
use rendezvous_db::repositories::MemberRepo;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Smallest byte sequence the upload check recognizes as a PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        media: MediaConfig::Local {
            root: std::env::temp_dir().join("rendezvous-test-photos"),
            public_base_url: "http://localhost:3000/photos".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Media store double
// ---------------------------------------------------------------------------

/// In-memory [`MediaStore`] that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingMediaStore {
    uploads: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    pub fail_upload: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl RecordingMediaStore {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    fn backend(&self) -> &'static str {
        "recording"
    }

    async fn upload(&self, _image: ImageUpload) -> Result<StoredImage, MediaError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(MediaError::Rejected {
                message: "Upload rejected by store".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(StoredImage {
            url: format!("https://media.test/photo-{n}.png"),
            public_id: format!("photo-{n}"),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(MediaError::Rejected {
                message: "Delete rejected by store".into(),
            });
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router backed by a fresh recording store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool, Arc::new(RecordingMediaStore::default()))
}

/// Build the full application router with the given media store, using the
/// same middleware stack as production.
pub fn build_test_app_with_store(pool: PgPool, store: Arc<RecordingMediaStore>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, Arc::new(config.clone()), store);
    build_app_router(state, &config)
}

/// Sign a bearer token for `username` with the test secret.
pub fn token_for(username: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    generate_access_token(username, 15, &config).expect("token signing should succeed")
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert a member born on January 1st, `age` years ago.
pub async fn seed_member(pool: &PgPool, username: &str, gender: &str, age: i32) -> Member {
    let today = chrono::Utc::now().date_naive();
    let dob = NaiveDate::from_ymd_opt(today.year() - age, 1, 1).expect("valid seed date");
    let input = CreateMember {
        username: username.to_string(),
        known_as: username.to_string(),
        gender: gender.to_string(),
        date_of_birth: dob,
        city: Some("Lisbon".to_string()),
        country: Some("Portugal".to_string()),
    };
    MemberRepo::create(pool, &input)
        .await
        .expect("member creation should succeed")
}

/// Install a row trigger that makes every `event` (`INSERT`, `UPDATE` or
/// `DELETE`) on `table` raise, so the next write inside a unit of work fails.
pub async fn reject_writes(pool: &PgPool, table: &str, event: &str) {
    sqlx::query(
        "CREATE OR REPLACE FUNCTION reject_write() RETURNS trigger AS $$
         BEGIN
             RAISE EXCEPTION 'writes to % are disabled', TG_TABLE_NAME;
         END;
         $$ LANGUAGE plpgsql",
    )
    .execute(pool)
    .await
    .expect("trigger function creation should succeed");

    let trigger = format!(
        "CREATE TRIGGER reject_{table}_{event} BEFORE {event} ON {table} \
         FOR EACH ROW EXECUTE FUNCTION reject_write()",
        event = event.to_lowercase(),
    );
    sqlx::query(&trigger)
        .execute(pool)
        .await
        .expect("trigger creation should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single-file multipart form to `uri`.
pub async fn post_photo(app: Router, uri: &str, bytes: &[u8], token: &str) -> Response {
    let boundary = "rendezvous-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"me.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
