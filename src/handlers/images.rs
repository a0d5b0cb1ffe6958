use axum::{
    extract::{rejection::PathRejection, Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, AppResult},
    models::{QueryParams, ResolvedRequest},
    services::{resolver, upstream::UpstreamImage},
    AppState,
};

// Image by endpoint, or a random one when the endpoint is "random"
// GET /{type}/{endpoint}?ignore=a,b,c
pub async fn image_by_endpoint(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
    RawQuery(raw_query): RawQuery,
) -> AppResult<Response> {
    let Path((type_param, endpoint_param)) = path.map_err(reject_path)?;
    tracing::info!("Image request for /{}/{}", type_param, endpoint_param);

    let query = QueryParams::parse(raw_query.as_deref());
    let resolved = {
        let mut rng = rand::thread_rng();
        resolver::resolve_path(&type_param, &endpoint_param, query.first("ignore"), &mut rng)
    }?;

    proxy_image(&state, &resolved).await
}

// Image from a caller supplied endpoint list
// GET /{type}?eps=a,b,c
pub async fn image_from_list(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    RawQuery(raw_query): RawQuery,
) -> AppResult<Response> {
    let Path(type_param) = path.map_err(reject_path)?;
    let query = QueryParams::parse(raw_query.as_deref());
    let eps = query.first("eps");
    tracing::info!("Image list request for /{} eps={:?}", type_param, eps);

    let resolved = {
        let mut rng = rand::thread_rng();
        resolver::resolve_eps(&type_param, eps, &mut rng)
    }?;

    proxy_image(&state, &resolved).await
}

// Undecodable path segments can never name a catalog endpoint
fn reject_path(rejection: PathRejection) -> AppError {
    tracing::debug!("Rejected path: {}", rejection.body_text());
    AppError::BadEndpoint
}

async fn proxy_image(state: &AppState, resolved: &ResolvedRequest) -> AppResult<Response> {
    tracing::debug!("Resolved to {}/{}", resolved.category, resolved.endpoint);
    let image = state.upstream.fetch(resolved).await?;
    Ok(image_response(image))
}

/// Success response: upstream content type plus the streamed image body.
pub fn image_response(image: UpstreamImage) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(content_type) = image.content_type.clone() {
        headers.insert(header::CONTENT_TYPE, content_type);
    }

    (StatusCode::OK, headers, image.into_body()).into_response()
}
