//! OpenAI-compatible API client.
//!
//! Supports both `/chat/completions` and `/responses`. Image and document
//! blocks are sent inline as `data:` URLs, so any compatible endpoint that
//! accepts inline media works through `LLM_OPENAI_BASE_URL`.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::{LlmTimeouts, OpenAiApiMode};
use super::types::{ChatResponse, Content, ContentBlock, LlmError, Message};

/// File name reported for inline documents; providers require one.
const INLINE_DOCUMENT_NAME: &str = "attachment.pdf";

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, mode: OpenAiApiMode, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url: base_url.trim_end_matches('/').to_string(), mode })
    }

    /// # Errors
    ///
    /// Returns an [`LlmError`] on transport failure, non-200 status, or an
    /// unparseable body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let msgs = build_chat_completions_messages(system, messages);
                let body = CcRequest { model, max_tokens, messages: &msgs };
                let text = self.send_json("/chat/completions", &body).await?;
                parse_chat_completions_response(&text)
            }
            OpenAiApiMode::Responses => {
                let input = build_responses_input(messages);
                let body = RespRequest { model, max_output_tokens: max_tokens, instructions: system, input: &input };
                let text = self.send_json("/responses", &body).await?;
                parse_responses_response(&text)
            }
        }
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// CHAT COMPLETIONS: wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage],
}

#[derive(Debug, Serialize)]
struct CcMessage {
    role: String,
    content: CcContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CcContent {
    Text(String),
    Parts(Vec<CcPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CcPart {
    Text { text: String },
    ImageUrl { image_url: CcImageUrl },
    File { file: CcFile },
}

#[derive(Debug, Serialize)]
struct CcImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct CcFile {
    filename: &'static str,
    file_data: String,
}

fn build_chat_completions_messages(system: &str, messages: &[Message]) -> Vec<CcMessage> {
    let mut out = Vec::new();
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system".to_string(), content: CcContent::Text(system.to_string()) });
    }
    for message in messages {
        let content = match &message.content {
            Content::Text(text) => CcContent::Text(text.clone()),
            Content::Blocks(blocks) => {
                let parts: Vec<CcPart> = blocks
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(CcPart::Text { text: text.clone() }),
                        ContentBlock::Image { source } => {
                            Some(CcPart::ImageUrl { image_url: CcImageUrl { url: source.data_url() } })
                        }
                        ContentBlock::Document { source } => {
                            Some(CcPart::File { file: CcFile { filename: INLINE_DOCUMENT_NAME, file_data: source.data_url() } })
                        }
                        ContentBlock::Thinking { .. } | ContentBlock::Unknown => None,
                    })
                    .collect();
                if parts.is_empty() {
                    continue;
                }
                CcContent::Parts(parts)
            }
        };
        out.push(CcMessage { role: message.role.clone(), content });
    }
    out
}

// =============================================================================
// RESPONSES: wire types
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    instructions: &'a str,
    input: &'a [RespInputItem],
}

#[derive(Debug, Serialize)]
struct RespInputItem {
    #[serde(rename = "type")]
    item_type: &'static str,
    role: String,
    content: Vec<RespPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RespPart {
    InputText { text: String },
    InputImage { image_url: String },
    InputFile { filename: &'static str, file_data: String },
}

fn build_responses_input(messages: &[Message]) -> Vec<RespInputItem> {
    messages
        .iter()
        .filter_map(|message| {
            let content: Vec<RespPart> = match &message.content {
                Content::Text(text) => vec![RespPart::InputText { text: text.clone() }],
                Content::Blocks(blocks) => blocks
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(RespPart::InputText { text: text.clone() }),
                        ContentBlock::Image { source } => Some(RespPart::InputImage { image_url: source.data_url() }),
                        ContentBlock::Document { source } => {
                            Some(RespPart::InputFile { filename: INLINE_DOCUMENT_NAME, file_data: source.data_url() })
                        }
                        ContentBlock::Thinking { .. } | ContentBlock::Unknown => None,
                    })
                    .collect(),
            };
            (!content.is_empty()).then(|| RespInputItem { item_type: "message", role: message.role.clone(), content })
        })
        .collect()
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

fn usage(root: &Value, key: &str) -> u64 {
    root.get("usage")
        .and_then(|u| u.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn model_of(root: &Value) -> String {
    root.get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };

    let mut content = Vec::new();
    if let Some(text) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
    {
        if !text.is_empty() {
            content.push(ContentBlock::Text { text: text.to_string() });
        }
    }

    let stop_reason = match choice.get("finish_reason").and_then(Value::as_str) {
        Some("length") => "max_tokens",
        _ => "end_turn",
    };

    Ok(ChatResponse {
        content,
        model: model_of(&root),
        stop_reason: stop_reason.to_string(),
        input_tokens: usage(&root, "prompt_tokens"),
        output_tokens: usage(&root, "completion_tokens"),
    })
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let mut content = Vec::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        let parts = items
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
            .filter_map(|item| item.get("content").and_then(Value::as_array))
            .flatten();
        for part in parts {
            let kind = part.get("type").and_then(Value::as_str);
            let text = part.get("text").and_then(Value::as_str).unwrap_or("");
            if matches!(kind, Some("output_text" | "text")) && !text.is_empty() {
                content.push(ContentBlock::Text { text: text.to_string() });
            }
        }
    } else if let Some(output_text) = root.get("output_text").and_then(Value::as_str) {
        if !output_text.is_empty() {
            content.push(ContentBlock::Text { text: output_text.to_string() });
        }
    }

    let truncated = root
        .get("incomplete_details")
        .and_then(|d| d.get("reason"))
        .and_then(Value::as_str)
        == Some("max_output_tokens");

    Ok(ChatResponse {
        content,
        model: model_of(&root),
        stop_reason: if truncated { "max_tokens" } else { "end_turn" }.to_string(),
        input_tokens: usage(&root, "input_tokens"),
        output_tokens: usage(&root, "output_tokens"),
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
