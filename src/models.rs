use serde::{Deserialize, Serialize};
use std::fmt;

// Content category exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sfw,
    Nsfw,
}

impl Category {
    /// Parse a path segment, ignoring case. Unknown categories yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "sfw" => Some(Category::Sfw),
            "nsfw" => Some(Category::Nsfw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sfw => "sfw",
            Category::Nsfw => "nsfw",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete (category, endpoint) pair chosen for one incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub category: Category,
    pub endpoint: String,
}

impl ResolvedRequest {
    pub fn new(category: Category, endpoint: impl Into<String>) -> Self {
        Self {
            category,
            endpoint: endpoint.into(),
        }
    }
}

// Image location returned by the first upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamMetadata {
    pub url: String,
}

// Every JSON body this service writes has this shape
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decoded query string in request order.
///
/// Lookups return the first value of a key, so a repeated `eps` or `ignore`
/// never rejects the request.
#[derive(Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(raw) => Self(url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect()),
            None => Self::default(),
        }
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}
