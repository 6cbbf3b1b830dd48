pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::extractor::Extractor;

pub struct AppState {
    pub extractor: Extractor,
}

/// Use Case:
/// This module implements the extraction REST API.
/// External clients hit:
/// 1. /api/v1/blogger/{token} to resolve a player token into stream URLs
/// 2. /api/v1/health as a liveness probe
///
/// All extraction logic lives in src/extractor/; the handlers only map
/// pipeline outcomes onto the { success, data } response envelope.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/blogger/{token}", get(handlers::extract_video))
        .route("/api/v1/health", get(handlers::health))
}
