//! HTTP surface tests.
//!
//! Drives the full router with `oneshot`, no socket involved. Each test
//! gets its own temp directory for the snapshot and uploads.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::app::build_app;
use crate::config::AppConfig;
use crate::state::{AppState, Article, ArticleStore};

struct TestApp {
    dir: TempDir,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(|_| {})
    }

    fn with_upload_limit(max_upload_bytes: usize) -> Self {
        Self::with_config(|config| config.max_upload_bytes = max_upload_bytes)
    }

    fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig {
            data_path: dir.path().join("articles.json"),
            uploads_dir: dir.path().join("uploads"),
            tinymce_dir: dir.path().join("tinymce"),
            max_upload_bytes: 1024 * 1024,
            server_version: "9.9.9".to_string(),
            ..AppConfig::default()
        };
        adjust(&mut config);
        let store = ArticleStore::shared(&config.data_path);
        let state = AppState::new(store, config);
        Self { dir, state }
    }

    fn router(&self) -> Router {
        build_app(self.state.clone())
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
        let res = self.router().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8_lossy(&body).into_owned())
    }

    async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

fn form_post(body: &str) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "X-SUSU-BOUNDARY";

fn multipart_upload(uri: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ============================================================
// CREATE
// ============================================================

#[tokio::test]
async fn test_create_form_embeds_unused_id() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    let start = body.find(r#"name="id" value=""#).unwrap() + r#"name="id" value=""#.len();
    let id = &body[start..start + 8];
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(!app.state.store.contains(id));
}

#[tokio::test]
async fn test_create_redirects_to_article() {
    let app = TestApp::new();

    let (status, headers, _) = app
        .send(form_post("id=ab12CD34&title=Hello&content=%3Cp%3EHi%3C%2Fp%3E"))
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/article?id=ab12CD34");

    let stored = app.state.store.get("ab12CD34").unwrap();
    assert_eq!(stored.title, "Hello");
    assert_eq!(stored.content, "<p>Hi</p>");

    let (status, _, page) = app.get("/article?id=ab12CD34").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<p>Hi</p>"));
}

#[tokio::test]
async fn test_create_persists_snapshot() {
    let app = TestApp::new();
    app.send(form_post("id=ab12CD34&title=Saved&content=x")).await;

    let fresh = ArticleStore::new(app.dir.path().join("articles.json"));
    assert_eq!(fresh.load().unwrap(), 1);
    assert_eq!(fresh.get("ab12CD34").unwrap().title, "Saved");
}

#[tokio::test]
async fn test_create_succeeds_when_snapshot_cannot_be_written() {
    let blocker = TempDir::new().unwrap();
    let not_a_dir = blocker.path().join("blocker");
    std::fs::write(&not_a_dir, "plain file").unwrap();
    let app = TestApp::with_config(|config| config.data_path = not_a_dir.join("articles.json"));

    let (status, headers, _) = app
        .send(form_post("id=ab12CD34&title=Unsaved&content=x"))
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/article?id=ab12CD34");
    assert_eq!(app.state.store.get("ab12CD34").unwrap().title, "Unsaved");
    assert!(!not_a_dir.join("articles.json").exists());

    let (status, _, page) = app.get("/article?id=ab12CD34").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Unsaved"));
}

#[tokio::test]
async fn test_create_with_existing_id_is_conflict() {
    let app = TestApp::new();
    app.send(form_post("id=ab12CD34&title=First&content=x")).await;

    let (status, _, body) = app
        .send(form_post("id=ab12CD34&title=Second&content=y"))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "Article already exists");
    assert_eq!(app.state.store.get("ab12CD34").unwrap().title, "First");
}

#[tokio::test]
async fn test_create_without_id_generates_one() {
    let app = TestApp::new();

    let (status, headers, _) = app.send(form_post("title=NoId&content=x")).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = headers[header::LOCATION].to_str().unwrap();
    let id = location.strip_prefix("/article?id=").unwrap();
    assert_eq!(id.len(), 8);
    assert_eq!(app.state.store.get(id).unwrap().title, "NoId");
}

// ============================================================
// VIEW / OVERVIEW
// ============================================================

#[tokio::test]
async fn test_view_missing_id_is_bad_request() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/article").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing ID");
}

#[tokio::test]
async fn test_view_unknown_id_is_not_found() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/article?id=missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Article not found");
}

#[tokio::test]
async fn test_overview_lists_newest_first() {
    let app = TestApp::new();
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for (i, id) in ["oldest00", "middle00", "newest00"].iter().enumerate() {
        app.state
            .store
            .put(Article {
                id: id.to_string(),
                title: id.to_string(),
                content: String::new(),
                created_at: base + Duration::days(i as i64),
            })
            .unwrap();
    }

    let (status, _, body) = app.get("/overview").await;

    assert_eq!(status, StatusCode::OK);
    let newest = body.find("newest00").unwrap();
    let middle = body.find("middle00").unwrap();
    let oldest = body.find("oldest00").unwrap();
    assert!(newest < middle && middle < oldest);
}

// ============================================================
// UPLOAD
// ============================================================

#[tokio::test]
async fn test_upload_stores_file_and_serves_it() {
    let app = TestApp::new();

    let (status, _, body) = app
        .send(multipart_upload("/upload?id=ab12CD34", "file", "cat.png", b"PNGDATA"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["location"], "/uploads/ab12CD34/cat.png");

    let on_disk = app.dir.path().join("uploads").join("ab12CD34").join("cat.png");
    assert_eq!(std::fs::read(on_disk).unwrap(), b"PNGDATA");

    let (status, _, served) = app.get("/uploads/ab12CD34/cat.png").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, "PNGDATA");
}

#[tokio::test]
async fn test_upload_location_is_percent_encoded() {
    let app = TestApp::new();

    let (status, _, body) = app
        .send(multipart_upload("/upload?id=ab12CD34", "file", "photo #1.png", b"HASHDATA"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    let location = json["location"].as_str().unwrap();
    assert_eq!(location, "/uploads/ab12CD34/photo%20%231.png");

    // Stored under the raw name, reachable through the encoded URL.
    let on_disk = app.dir.path().join("uploads").join("ab12CD34").join("photo #1.png");
    assert_eq!(std::fs::read(on_disk).unwrap(), b"HASHDATA");

    let (status, _, served) = app.get(location).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, "HASHDATA");
}

#[tokio::test]
async fn test_upload_missing_id_is_bad_request() {
    let app = TestApp::new();

    let (status, _, body) = app
        .send(multipart_upload("/upload", "file", "cat.png", b"x"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing ID");
}

#[tokio::test]
async fn test_upload_rejects_traversal_id() {
    let app = TestApp::new();

    let (status, _, _) = app
        .send(multipart_upload("/upload?id=..%2F..%2Fetc", "file", "cat.png", b"x"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_upload_without_file_field_is_bad_request() {
    let app = TestApp::new();

    let (status, _, body) = app
        .send(multipart_upload("/upload?id=ab12CD34", "other", "cat.png", b"x"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Error retrieving the file");
}

#[tokio::test]
async fn test_upload_over_limit_is_payload_too_large() {
    let app = TestApp::with_upload_limit(64);

    let (status, _, _) = app
        .send(multipart_upload("/upload?id=ab12CD34", "file", "big.bin", &[7u8; 4096]))
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.dir.path().join("uploads").join("ab12CD34").exists());
}

// ============================================================
// SYSTEM
// ============================================================

#[tokio::test]
async fn test_system_endpoints() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/system/alive").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (_, _, body) = app.get("/system/version").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["version"], "9.9.9");

    app.send(form_post("title=x&content=y")).await;
    let (_, _, body) = app.get("/system/stats").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["articles"], 1);
}
