use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::MessageResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad endpoint")]
    BadEndpoint,

    #[error("Bad type")]
    BadType,

    #[error("All endpoints were ignored")]
    AllEndpointsIgnored,

    #[error("Missing eps query parameter")]
    MissingEps,

    #[error("External API Error")]
    ExternalApi(StatusCode),

    #[error("URL not found in response")]
    UrlNotFound,

    #[error("Failed to fetch image")]
    ImageFetch,

    // Anything that escapes the fetch path is reported with its own text
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadEndpoint
            | AppError::BadType
            | AppError::AllEndpointsIgnored
            | AppError::MissingEps => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(status) => *status,
            AppError::UrlNotFound
            | AppError::ImageFetch
            | AppError::Upstream(_)
            | AppError::Config(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("API Error: {} - {}", status.as_u16(), self);
        } else {
            tracing::debug!("Rejected request: {} - {}", status.as_u16(), self);
        }

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
