use axum::body::Body;
use futures_util::TryStreamExt;
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    redirect::Policy,
    Client, Proxy, StatusCode,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    config::UpstreamConfig,
    error::{AppError, AppResult},
    models::{ResolvedRequest, UpstreamMetadata},
};

/// Shared outbound client for both upstream stages.
///
/// Cloning is cheap: the underlying connection pool is reference counted.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
    api_url: String,
}

/// A successful image fetch whose body has not been read yet.
#[derive(Debug)]
pub struct UpstreamImage {
    pub content_type: Option<HeaderValue>,
    response: reqwest::Response,
}

impl UpstreamImage {
    /// Relay the upstream body chunk by chunk.
    pub fn into_body(self) -> Body {
        Body::from_stream(self.response.bytes_stream().map_err(std::io::Error::other))
    }
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(10))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.idle_timeout());

        let builder = match &config.proxy {
            Some(proxy) => {
                let proxy = Proxy::all(proxy.as_str())
                    .map_err(|e| AppError::Config(format!("Invalid upstream proxy '{}': {}", proxy, e)))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn metadata_url(&self, request: &ResolvedRequest) -> String {
        format!("{}/{}/{}", self.api_url, request.category, request.endpoint)
    }

    /// Stage one: ask the upstream API where the image lives.
    pub async fn fetch_metadata(&self, request: &ResolvedRequest) -> AppResult<UpstreamMetadata> {
        let api_url = self.metadata_url(request);
        debug!("Fetching metadata from: {}", api_url);

        let response = self.client.get(&api_url).send().await.map_err(|e| {
            error!("Metadata request to {} failed: {}", api_url, e);
            e
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("External API returned status {} for {}", status, api_url);
            return Err(AppError::ExternalApi(status));
        }

        let body: Value = response.json().await?;
        let url = body
            .get("url")
            .and_then(Value::as_str)
            .ok_or(AppError::UrlNotFound)?;

        Ok(UpstreamMetadata {
            url: url.to_string(),
        })
    }

    /// Stage two: fetch the image itself. Every failure collapses into
    /// [`AppError::ImageFetch`].
    pub async fn fetch_image(&self, metadata: &UpstreamMetadata) -> AppResult<UpstreamImage> {
        debug!("Fetching image from: {}", metadata.url);

        let response = self.client.get(&metadata.url).send().await.map_err(|e| {
            warn!("Image request to {} failed: {}", metadata.url, e);
            AppError::ImageFetch
        })?;

        if !response.status().is_success() {
            warn!("Image host returned status {} for {}", response.status(), metadata.url);
            return Err(AppError::ImageFetch);
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        debug!("Image content type: {:?}", content_type);

        Ok(UpstreamImage {
            content_type,
            response,
        })
    }

    /// Run both stages; stage two only starts after stage one succeeded.
    pub async fn fetch(&self, request: &ResolvedRequest) -> AppResult<UpstreamImage> {
        let metadata = self.fetch_metadata(request).await?;
        self.fetch_image(&metadata).await
    }
}
