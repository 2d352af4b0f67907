//! Shared helpers for API integration tests.
//!
//! Tests run the production router against temporary directories, so the
//! real middleware stack, routing, and error mapping are exercised without
//! touching any fixed paths.

#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use karta_api::config::{AppConfig, CardPaths, ServerConfig};
use karta_api::router::build_app_router;
use karta_api::state::AppState;

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "card-test-boundary";

/// Build a test `AppConfig` rooted at a temporary directory.
///
/// Template and font point into the root but are not created; individual
/// tests create them when asset presence matters.
pub fn test_config(root: &Path) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
        },
        paths: CardPaths {
            authoritative_dir: root.join("authoritative"),
            mirror_dir: root.join("mirror"),
            ledger_path: root.join("ledger.csv"),
            template_path: root.join("karta_a.jpg"),
            font_path: root.join("font.ttf"),
        },
    }
}

/// Build the full application router over a temporary directory, mirroring
/// the construction in `main.rs` so tests exercise the same middleware
/// stack that production uses.
pub fn build_test_app(root: &Path) -> Router {
    std::fs::create_dir_all(root.join("mirror")).unwrap();
    build_app_router(AppState::from_config(test_config(root)))
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a multipart POST request against the app.
pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a JSON PATCH request against the app.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assemble a multipart form body with optional photo part.
pub fn multipart_body(text_fields: &[(&str, &str)], photo: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in text_fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A small decodable PNG for upload tests.
pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::new(8, 10);
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    bytes
}

/// Convenience: assert status and return the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
