use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::error;

use crate::common::ExtractError;
use crate::rest::{AppState, models::ApiResponse};

const PAGE_URL_PREFIX: &str = "https://www.blogger.com/video.g?token=";

/// Clients sometimes pass the whole player URL instead of the bare
/// token, possibly percent-encoded a second time. The router has
/// already decoded the path segment once, so a further decode is only
/// applied when it uncovers the player-URL prefix; a bare token keeps
/// any `%XX` sequences it legitimately contains.
fn normalize_token(raw: &str) -> String {
    let token = raw.strip_prefix(PAGE_URL_PREFIX).unwrap_or(raw);
    if let Ok(decoded) = urlencoding::decode(token) {
        if let Some(stripped) = decoded.strip_prefix(PAGE_URL_PREFIX) {
            return stripped.to_string();
        }
    }
    token.to_string()
}

/// GET /api/v1/blogger/{token}
pub async fn extract_video(
    Path(token): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let token = normalize_token(&token);
    tracing::debug!("Extract request for token: '{}'", token);

    match state.extractor.extract(&token).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::ok(result))).into_response(),
        Err(ExtractError::EmptyToken) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No token")),
        )
            .into_response(),
        Err(e) => {
            error!("Extraction failed before any strategy ran: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/v1/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "up" }))
}
