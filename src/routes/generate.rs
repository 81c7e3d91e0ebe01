//! Generation route: text and attachments in, genogram document out.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use genogram::LayoutResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;
use crate::llm::types::LlmError;
use crate::services::generate::{self as service, GenerateError, GenerateRequest};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    /// Also run the layout engine over the generated document.
    #[serde(default)]
    pub layout: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Document(Value),
    WithLayout { document: Value, layout: LayoutResult },
}

/// `POST /api/generate`: extract a genogram document with the LLM.
pub async fn generate(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let llm = service::resolve_client(state.llm.as_ref(), &state.config.llm, request.api_key.as_deref())
        .map_err(generate_error)?;
    let document = service::generate(llm.as_ref(), &request, state.config.generate_max_tokens)
        .await
        .map_err(generate_error)?;

    if !query.layout {
        return Ok(Json(GenerateResponse::Document(document)));
    }
    // The model produced something that is not a document at all.
    let layout = genogram::layout_value(&document, &state.config.layout)
        .map_err(|e| ApiError::new(StatusCode::BAD_GATEWAY, e))?;
    Ok(Json(GenerateResponse::WithLayout { document, layout }))
}

pub(crate) fn generate_error_to_status(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::EmptyInput | GenerateError::NotConfigured => StatusCode::BAD_REQUEST,
        GenerateError::UnsupportedAttachment(_) | GenerateError::Llm(LlmError::UnsupportedMedia(_)) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        GenerateError::Llm(_) | GenerateError::Unparseable(_) => StatusCode::BAD_GATEWAY,
    }
}

fn generate_error(err: GenerateError) -> ApiError {
    ApiError::new(generate_error_to_status(&err), err)
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
