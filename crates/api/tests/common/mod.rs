#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;
use yarnstash_core::storage::{self, FileStore, StorageError};

use yarnstash_api::config::{LogFormat, ServerConfig};
use yarnstash_api::router::build_app_router;
use yarnstash_api::state::AppState;

/// Public base URL used by the test configuration.
pub const BASE_URL: &str = "http://localhost:3000";

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "yarnstash-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join("yarnstash-test-uploads"),
        public_base_url: BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
        search_case_sensitive: false,
        log_format: LogFormat::Text,
    }
}

/// In-memory file store that records every stored and deleted file.
#[derive(Default)]
pub struct RecordingFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    counter: AtomicUsize,
    fail_deletes: bool,
}

impl RecordingFileStore {
    /// A store whose deletions always fail.
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    /// Names of the files currently held.
    pub fn stored(&self) -> Vec<String> {
        let mut names: Vec<_> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    /// Names passed to `delete`, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Put a file in place as if it had been uploaded earlier.
    pub fn seed(&self, name: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), b"seed".to_vec());
    }
}

#[async_trait]
impl FileStore for RecordingFileStore {
    async fn ensure_dir(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn store(&self, data: &[u8], original_name: &str) -> Result<String, StorageError> {
        if data.is_empty() {
            return Err(StorageError::Empty);
        }
        let ext = storage::image_extension(original_name)?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let name = format!("test-{n}.{ext}");
        self.files
            .lock()
            .unwrap()
            .insert(name.clone(), data.to_vec());
        Ok(name)
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.deleted.lock().unwrap().push(name.to_string());
        if self.fail_deletes {
            return Err(StorageError::Io(std::io::Error::other("disk on fire")));
        }
        self.files.lock().unwrap().remove(name);
        Ok(())
    }
}

/// Build the full application router around the given pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_files(pool, Arc::new(RecordingFileStore::default()))
}

/// Like [`build_test_app`], with a caller-held file store.
pub fn build_test_app_with_files(pool: SqlitePool, files: Arc<RecordingFileStore>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        files,
    };
    build_app_router(state, &config)
}

/// Public URL of a stored file name.
pub fn upload_url(name: &str) -> String {
    format!("{BASE_URL}/uploads/{name}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

/// Encode parts as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response<Body> {
    send_multipart(app, Method::POST, uri, parts).await
}
