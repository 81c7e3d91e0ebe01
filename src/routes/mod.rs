//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the genogram layout, document store, generation,
//! and drawing render endpoints. Every handler error becomes an [`ApiError`]:
//! a status code plus a JSON `{"error": "..."}` body.

pub mod documents;
pub mod generate;
pub mod layout;
pub mod render;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl ToString) -> Self {
        Self { status, message: message.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/genogram/layout", post(layout::layout))
        .route("/api/documents/{namespace}", get(documents::list))
        .route(
            "/api/documents/{namespace}/{name}",
            get(documents::load)
                .put(documents::save)
                .delete(documents::delete),
        )
        .route("/api/generate", post(generate::generate))
        .route("/api/render/floor-plan", post(render::render_floor_plan))
        .route("/api/render/body-map", post(render::render_body_map))
        .route("/api/config/check", get(config_check))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ConfigCheckResponse {
    pub configured: bool,
}

/// `GET /api/config/check`: whether generation works without a per-request key.
pub async fn config_check(State(state): State<AppState>) -> Json<ConfigCheckResponse> {
    Json(ConfigCheckResponse { configured: state.llm.is_some() })
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
