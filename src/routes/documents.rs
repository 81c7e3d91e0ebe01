//! Document store routes, one namespace per drawing family.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::services::store::{Namespace, StoreError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub names: Vec<String>,
}

fn namespace(raw: &str) -> Result<Namespace, ApiError> {
    Namespace::parse(raw).ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("unknown namespace: {raw}")))
}

/// `GET /api/documents/{namespace}`: list document names.
pub async fn list(State(state): State<AppState>, Path(ns): Path<String>) -> Result<Json<ListResponse>, ApiError> {
    let names = state.store.list(namespace(&ns)?).await?;
    Ok(Json(ListResponse { names }))
}

/// `GET /api/documents/{namespace}/{name}`: load one document.
pub async fn load(
    State(state): State<AppState>,
    Path((ns, name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.store.load(namespace(&ns)?, &name).await?))
}

/// `PUT /api/documents/{namespace}/{name}`: create or overwrite.
pub async fn save(
    State(state): State<AppState>,
    Path((ns, name)): Path<(String, String)>,
    Json(doc): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    state.store.save(namespace(&ns)?, &name, &doc).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `DELETE /api/documents/{namespace}/{name}`.
pub async fn delete(
    State(state): State<AppState>,
    Path((ns, name)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(namespace(&ns)?, &name).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::InvalidName(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Io(_) | StoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::new(store_error_to_status(&err), err)
    }
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;
