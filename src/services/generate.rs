//! Genogram generation: free text and attachments in, raw genogram document out.
//!
//! DESIGN
//! ======
//! One user message carries the extraction instructions, the caller's text,
//! and every attachment as an inline block. The reply is expected to be JSON
//! in the layout input shape; it is parsed but not validated, so the layout
//! engine's degradation rules apply to whatever the model returns.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::llm::config::LlmConfig;
use crate::llm::types::{ContentBlock, LlmError, MediaSource, Message};
use crate::llm::{LlmChat, LlmClient};

// =============================================================================
// TYPES
// =============================================================================

/// Base64 file payload sent alongside the text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub text: String,
    pub files: Vec<Attachment>,
    /// Used only when the server has no key of its own.
    pub api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("text or at least one file is required")]
    EmptyInput,
    #[error("no LLM API key is configured")]
    NotConfigured,
    #[error("unsupported attachment type: {0}")]
    UnsupportedAttachment(String),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model reply is not valid JSON: {0}")]
    Unparseable(String),
}

// =============================================================================
// PROMPT
// =============================================================================

const PROMPT_HEADER: &str = r#"You are an expert at analysing family structures for care management.
Analyse all of the input below (text, images, PDFs such as handwritten diagrams or assessment sheets) and extract the information needed to draw a genogram as JSON.

OUTPUT FORMAT
{
  "members": [
    {
      "id": "unique id (e.g. self, father, mother, spouse, son1, daughter1)",
      "name": "name",
      "gender": "M / F",
      "birthYear": 1960,
      "isDeceased": false,
      "isSelf": true,
      "isKeyPerson": false,
      "generation": 0,
      "note": "remarks"
    }
  ],
  "marriages": [
    {
      "husband": "husband id",
      "wife": "wife id",
      "status": "married / divorced / separated / cohabitation",
      "children": ["child id 1", "child id 2"]
    }
  ]
}

GENERATION NUMBERING
- The person receiving care is generation 0.
- Parents are -1, grandparents -2.
- Children are 1, grandchildren 2.

RULES
- Mark the person receiving care with isSelf: true.
- Mark deceased people with isDeceased: true.
- Express marriages and divorces through marriages.
- List children in the children array of their parents' marriage.
- Whenever anyone's parents are known, always add the parents as a pair in marriages and include that person in its children, even if one parent has died. Without it no parent-child line can be drawn.
- If a handwritten diagram or assessment sheet is included, cover every family relationship it shows.

INFERENCE
- If the context implies a spouse or child (moved out, lives separately, and so on), create a spouse node even without a name ("husband", "wife") and add the marriage.
- Anyone with a son or daughter must have a marriage with a spouse, even if only one parent is known.
- When information is missing, make reasonable assumptions so the result is a complete family tree.

INPUT
"#;

const PROMPT_FOOTER: &str = "\n\nOutput only the JSON. No explanation.";

#[must_use]
pub fn build_prompt(text: &str) -> String {
    format!("{PROMPT_HEADER}{text}{PROMPT_FOOTER}")
}

fn attachment_block(file: &Attachment) -> Result<ContentBlock, GenerateError> {
    let source = MediaSource::base64(file.mime_type.clone(), file.data.clone());
    if file.mime_type.starts_with("image/") {
        Ok(ContentBlock::Image { source })
    } else if file.mime_type == "application/pdf" {
        Ok(ContentBlock::Document { source })
    } else {
        Err(GenerateError::UnsupportedAttachment(file.mime_type.clone()))
    }
}

/// Build the single user message for a request. Empty attachments are
/// skipped.
///
/// # Errors
///
/// [`GenerateError::EmptyInput`] when there is neither text nor a non-empty
/// file; [`GenerateError::UnsupportedAttachment`] for other media types.
pub fn build_message(request: &GenerateRequest) -> Result<Message, GenerateError> {
    let files: Vec<&Attachment> = request.files.iter().filter(|f| !f.data.is_empty()).collect();
    if request.text.trim().is_empty() && files.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let mut blocks = Vec::with_capacity(files.len() + 1);
    blocks.push(ContentBlock::Text { text: build_prompt(request.text.trim()) });
    for file in files {
        blocks.push(attachment_block(file)?);
    }
    Ok(Message::user(blocks))
}

// =============================================================================
// REPLY PARSING
// =============================================================================

/// Pull the JSON body out of a model reply: a ```json fence first, otherwise
/// the span from the first `{` to the last `}`, otherwise the whole reply.
#[must_use]
pub fn extract_json(reply: &str) -> &str {
    let reply = reply.trim();
    if let Some(start) = reply.find("```json") {
        let body = &reply[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    }
}

/// Parse a model reply into a raw document.
///
/// # Errors
///
/// Returns [`GenerateError::Unparseable`] when the extracted body is not JSON.
pub fn parse_reply(reply: &str) -> Result<Value, GenerateError> {
    serde_json::from_str(extract_json(reply)).map_err(|e| GenerateError::Unparseable(e.to_string()))
}

// =============================================================================
// GENERATE
// =============================================================================

/// Pick the client for a request. A server-side client always wins; otherwise
/// a per-request key builds a one-off client with the server's provider
/// settings.
///
/// # Errors
///
/// [`GenerateError::NotConfigured`] when neither is available, or
/// [`GenerateError::Llm`] if the one-off client cannot be built.
pub fn resolve_client(
    server: Option<&Arc<dyn LlmChat>>,
    config: &LlmConfig,
    request_key: Option<&str>,
) -> Result<Arc<dyn LlmChat>, GenerateError> {
    if let Some(client) = server {
        return Ok(Arc::clone(client));
    }
    let Some(key) = request_key.map(str::trim).filter(|k| !k.is_empty()) else {
        return Err(GenerateError::NotConfigured);
    };
    let client = LlmClient::from_config(config.with_api_key(key))?;
    Ok(Arc::new(client))
}

/// Run one generation request against `llm`.
///
/// # Errors
///
/// See [`GenerateError`].
pub async fn generate(llm: &dyn LlmChat, request: &GenerateRequest, max_tokens: u32) -> Result<Value, GenerateError> {
    let message = build_message(request)?;
    info!(text_len = request.text.len(), files = request.files.len(), "generate: request");

    let response = llm
        .chat(max_tokens, "", std::slice::from_ref(&message))
        .await
        .inspect_err(|e| warn!(error = %e, retryable = e.retryable(), "generate: provider call failed"))?;
    info!(
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        stop_reason = %response.stop_reason,
        "generate: reply received"
    );
    if response.stop_reason == "max_tokens" {
        warn!(max_tokens, "generate: reply truncated");
    }

    let document = parse_reply(&response.text());
    if let Err(e) = &document {
        warn!(error = %e, "generate: reply not parseable");
    }
    document
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
