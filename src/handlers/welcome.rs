use axum::response::Json;

use crate::models::MessageResponse;

pub const WELCOME_MESSAGE: &str = "Welcome to the waifu.pics API proxy";

/// Welcome endpoint
/// GET /
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new(WELCOME_MESSAGE))
}
