#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Duration;
use parking_lot::Mutex;
use tower::ServiceExt;

use storefront_backend::app::create_app;
use storefront_backend::config::AdminConfig;
use storefront_backend::media::{MediaError, MediaUploader, UploadFile};
use storefront_backend::services::auth_service::AccessGate;
use storefront_backend::services::session_store::SessionManager;
use storefront_backend::state::AppState;
use storefront_backend::store::MemoryCatalogStore;

pub const KEY: &str = "K-2026";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret-pass";

/// Uploader that records what it was given and hands back predictable URLs.
#[derive(Default)]
pub struct RecordingUploader {
    pub uploads: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MediaUploader for RecordingUploader {
    async fn upload(&self, file: UploadFile, folder: &str) -> Result<String, MediaError> {
        self.uploads
            .lock()
            .push((folder.to_string(), file.file_name.clone()));
        Ok(format!("https://media.test/{}/{}", folder, file.file_name))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogStore>,
    pub uploader: Arc<RecordingUploader>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        let uploader = Arc::new(RecordingUploader::default());
        let gate = AccessGate::new(
            AdminConfig {
                username: USERNAME.to_string(),
                password: PASSWORD.to_string(),
                access_key: KEY.to_string(),
            },
            SessionManager::new("integration-test-session-secret", Duration::hours(1)),
        );
        let state = AppState {
            store: store.clone(),
            media: uploader.clone(),
            gate: Arc::new(gate),
            media_folder: "accounts".to_string(),
            secure_cookie: false,
            max_upload_bytes: 5 * 1024 * 1024,
        };
        Self {
            router: create_app(state),
            store,
            uploader,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Logs in through the real gate and returns the `Cookie` header value.
    pub async fn login(&self) -> String {
        let response = self
            .post_form(
                &format!("/auth-admin?key={}", KEY),
                &format!("username={}&password={}", USERNAME, PASSWORD),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie_pair(&response).expect("login sets a session cookie")
    }
}

/// `name=value` part of the response's Set-Cookie header.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

pub const BOUNDARY: &str = "storefront-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}
