//! Anthropic Messages API client.
//!
//! Outgoing messages are reshaped for `/v1/messages` before sending: every
//! attachment is checked against the media types the API decodes and moved
//! ahead of the text that refers to it. Reply parsing is a pure function so
//! it can be tested without a network.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::LlmTimeouts;
use super::types::{ChatResponse, Content, ContentBlock, LlmError, MediaSource, Message};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Image encodings the Messages API accepts in an `image` block.
const IMAGE_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];
/// `document` blocks carry PDFs only.
const DOCUMENT_MEDIA_TYPES: [&str; 1] = ["application/pdf"];

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key })
    }

    /// Send one Messages request.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnsupportedMedia`] before any network call when an
    /// attachment cannot be sent to this API; otherwise an [`LlmError`] on
    /// transport failure, a non-success status, or an unparseable body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let shaped = shape_messages(messages)?;
        debug!(model, images = shaped.images, documents = shaped.documents, "anthropic: sending request");
        let body = MessagesRequest { model, max_tokens, system, messages: &shaped.messages };

        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// REQUEST SHAPING
// =============================================================================

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: &'a [WireMessage<'a>],
}

#[derive(Debug, PartialEq, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: Vec<WireBlock<'a>>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock<'a> {
    Text { text: &'a str },
    Image { source: &'a MediaSource },
    Document { source: &'a MediaSource },
}

/// Borrowed request messages plus attachment counts for logging.
#[derive(Debug)]
struct Shaped<'a> {
    messages: Vec<WireMessage<'a>>,
    images: usize,
    documents: usize,
}

fn shape_messages(messages: &[Message]) -> Result<Shaped<'_>, LlmError> {
    let mut shaped = Shaped { messages: Vec::with_capacity(messages.len()), images: 0, documents: 0 };

    for message in messages {
        let content = match &message.content {
            Content::Text(text) => vec![WireBlock::Text { text }],
            Content::Blocks(blocks) => {
                let mut attachments = Vec::new();
                let mut texts = Vec::new();
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => texts.push(WireBlock::Text { text }),
                        ContentBlock::Image { source } => {
                            accept_media(source, &IMAGE_MEDIA_TYPES)?;
                            shaped.images += 1;
                            attachments.push(WireBlock::Image { source });
                        }
                        ContentBlock::Document { source } => {
                            accept_media(source, &DOCUMENT_MEDIA_TYPES)?;
                            shaped.documents += 1;
                            attachments.push(WireBlock::Document { source });
                        }
                        // Reply-only blocks.
                        ContentBlock::Thinking { .. } | ContentBlock::Unknown => {}
                    }
                }
                attachments.extend(texts);
                attachments
            }
        };
        // The API rejects a message with empty content.
        if !content.is_empty() {
            shaped.messages.push(WireMessage { role: &message.role, content });
        }
    }

    Ok(shaped)
}

fn accept_media(source: &MediaSource, accepted: &[&str]) -> Result<(), LlmError> {
    if accepted.iter().any(|t| t.eq_ignore_ascii_case(&source.media_type)) {
        Ok(())
    } else {
        Err(LlmError::UnsupportedMedia(source.media_type.clone()))
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

fn parse_response(json: &str) -> Result<ChatResponse, LlmError> {
    let reply: MessagesResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    Ok(ChatResponse {
        content: reply
            .content
            .into_iter()
            .filter(|block| matches!(block, ContentBlock::Text { .. }))
            .collect(),
        model: reply.model,
        stop_reason: reply.stop_reason.unwrap_or_else(|| "end_turn".into()),
        input_tokens: reply.usage.input_tokens,
        output_tokens: reply.usage.output_tokens,
    })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
