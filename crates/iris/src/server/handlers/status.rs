//! Status and version endpoint handlers

use axum::extract::State;
use axum::response::Json;

use crate::server::types::{StatusResponse, VersionResponse};
use crate::server::AppState;

/// GET /status - Health check endpoint
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
  Json(StatusResponse {
    status: "healthy".to_string(),
    model: state.model.clone(),
    version: env!("CARGO_PKG_VERSION").to_string(),
  })
}

/// GET /version - Returns the crate version
pub async fn version() -> Json<VersionResponse> {
  Json(VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() })
}
