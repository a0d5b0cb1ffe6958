// Common test utilities for integration tests
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// Re-export waifu_proxy types for tests
pub use waifu_proxy::*;

pub const STUB_IMAGE_CONTENT_TYPE: &str = "image/png";

/// How the stub upstream should behave for every request it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Healthy,
    MetadataStatus(u16),
    MissingUrl,
    NonStringUrl,
    InvalidJson,
    ImageStatus(u16),
    UnreachableImage,
    MissingContentType,
}

#[derive(Clone)]
struct StubState {
    base_url: String,
    mode: StubMode,
}

/// In-process stand-in for both the metadata API and the image host.
pub struct StubUpstream {
    pub addr: SocketAddr,
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl StubUpstream {
    pub async fn start(mode: StubMode) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub upstream");
        let addr = listener.local_addr().expect("stub address");
        let base_url = format!("http://{}", addr);

        let router = Router::new()
            .route("/:category/:endpoint", get(stub_metadata))
            .route("/images/:category/:file", get(stub_image))
            .with_state(StubState {
                base_url: base_url.clone(),
                mode,
            });

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub upstream");
        });

        Self {
            addr,
            base_url,
            handle,
        }
    }

    /// Router of the proxy under test, pointed at this stub.
    pub fn app(&self) -> Router {
        create_app(AppState::new(test_config(&self.base_url)).expect("app state"))
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bytes the stub serves for a given image.
pub fn stub_image_bytes(category: &str, endpoint: &str) -> Vec<u8> {
    format!("image-bytes:{}/{}", category, endpoint).into_bytes()
}

async fn stub_metadata(
    State(state): State<StubState>,
    Path((category, endpoint)): Path<(String, String)>,
) -> Response {
    match state.mode {
        StubMode::MetadataStatus(code) => (
            StatusCode::from_u16(code).expect("valid status"),
            Json(json!({ "message": "upstream unavailable" })),
        )
            .into_response(),
        StubMode::MissingUrl => Json(json!({ "error": "nothing here" })).into_response(),
        StubMode::NonStringUrl => Json(json!({ "url": 42 })).into_response(),
        StubMode::InvalidJson => (
            [(header::CONTENT_TYPE, "application/json")],
            "this is not json",
        )
            .into_response(),
        StubMode::UnreachableImage => {
            Json(json!({ "url": "http://127.0.0.1:1/images/none.png" })).into_response()
        }
        StubMode::Healthy | StubMode::ImageStatus(_) | StubMode::MissingContentType => Json(json!({
            "url": format!("{}/images/{}/{}.png", state.base_url, category, endpoint)
        }))
        .into_response(),
    }
}

async fn stub_image(
    State(state): State<StubState>,
    Path((category, file)): Path<(String, String)>,
) -> Response {
    if let StubMode::ImageStatus(code) = state.mode {
        return StatusCode::from_u16(code).expect("valid status").into_response();
    }

    let endpoint = file.trim_end_matches(".png");
    if state.mode == StubMode::MissingContentType {
        return Response::new(Body::from(stub_image_bytes(&category, endpoint)));
    }

    (
        [(header::CONTENT_TYPE, STUB_IMAGE_CONTENT_TYPE)],
        stub_image_bytes(&category, endpoint),
    )
        .into_response()
}

/// Create a test configuration with sensible defaults
pub fn test_config(api_url: &str) -> Config {
    use waifu_proxy::config::{ServerConfig, UpstreamConfig};

    Config {
        server: ServerConfig {
            port: 8888,
            host: "127.0.0.1".to_string(),
        },
        upstream: UpstreamConfig {
            api_url: api_url.to_string(),
            connect_timeout_secs: 2,
            idle_timeout_secs: 5,
            ..UpstreamConfig::default()
        },
    }
}

/// Helper to create HTTP requests
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn options(uri: &str) -> Self {
        Self::new(Method::OPTIONS, uri)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut request = Request::builder()
            .method(self.method)
            .uri(self.uri);

        for (key, value) in self.headers {
            request = request.header(key, value);
        }

        request.body(Body::empty()).unwrap()
    }

    pub async fn send(self, app: &Router) -> TestResponse {
        let request = self.build();
        let response = app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Helper for response assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Failed to parse JSON response: {}. Body: {}", e, self.text()))
    }

    pub fn message(&self) -> String {
        let body: serde_json::Value = self.json();
        body["message"]
            .as_str()
            .unwrap_or_else(|| panic!("No message in body: {}", self.text()))
            .to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}. Body: {}",
            expected, self.status, self.text()
        );
    }

    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }

    pub fn assert_bad_request(&self, message: &str) {
        self.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(self.message(), message);
    }

    pub fn assert_no_cache(&self) {
        assert_eq!(self.header("cache-control"), Some(CACHE_CONTROL_VALUE));
    }
}
