//! Genogram layout route.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use genogram::{LayoutError, LayoutResult};
use serde_json::Value;

use super::ApiError;
use crate::state::AppState;

/// `POST /api/genogram/layout`: lay out a raw genogram document.
pub async fn layout(State(state): State<AppState>, Json(doc): Json<Value>) -> Result<Json<LayoutResult>, ApiError> {
    let result = genogram::layout_value(&doc, &state.config.layout).map_err(layout_error)?;
    Ok(Json(result))
}

pub(crate) fn layout_error_to_status(err: &LayoutError) -> StatusCode {
    match err {
        LayoutError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    }
}

fn layout_error(err: LayoutError) -> ApiError {
    ApiError::new(layout_error_to_status(&err), err)
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
