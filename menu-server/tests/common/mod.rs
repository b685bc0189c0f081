//! Shared helpers for router tests
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, Response, header};
use http_body_util::BodyExt;
use menu_server::auth::{AuthProvider, PasswordAuthProvider};
use menu_server::db::{ContentStore, MemoryContentStore};
use menu_server::storage::LocalBlobStore;
use menu_server::{AppState, Config, api, util};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "owner@cafein.test";
pub const ADMIN_PASSWORD: &str = "flat-white";
pub const ACCESS_CODE: &str = "latte-art";
pub const BASE_URL: &str = "http://menu.cafein.test";

pub struct TestApp {
    pub router: Router,
    pub media: TempDir,
}

pub fn config(access_code: Option<&str>) -> Config {
    Config {
        admin_access_code: access_code.map(str::to_string),
        jwt_secret: "router-test-secret".into(),
        admin_email: ADMIN_EMAIL.into(),
        public_base_url: BASE_URL.into(),
        ..Config::default()
    }
}

pub fn app_with(config: &Config, content: Arc<dyn ContentStore>) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let blobs = LocalBlobStore::new(media.path(), &config.public_base_url);
    let hash = util::hash_password(ADMIN_PASSWORD).unwrap();
    let auth: Arc<dyn AuthProvider> = Arc::new(PasswordAuthProvider::new(
        &config.admin_email,
        &hash,
        &config.jwt_secret,
    ));
    let state = AppState::with_backends(
        config,
        content,
        Arc::new(blobs),
        auth,
        Some(media.path().to_path_buf()),
    );
    TestApp {
        router: api::build_app(state),
        media,
    }
}

pub fn app() -> TestApp {
    app_with(
        &config(Some(ACCESS_CODE)),
        Arc::new(MemoryContentStore::new()),
    )
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sign in and return the bearer token
    pub async fn sign_in(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), 200);
        let body = json_body(response).await;
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(3, 3, image::Rgb([90, 60, 30]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

const BOUNDARY: &str = "cafeinboundary7MA4YWxkTrZu0gW";

/// Build a multipart/form-data request
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
