use super::*;
use crate::llm::types::{Content, MediaSource};

fn make_response(content: serde_json::Value) -> String {
    serde_json::json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": content,
        "model": "claude-sonnet-4-5-20250929",
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 100, "output_tokens": 50 }
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([
        { "type": "text", "text": "{\"members\": []}" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "{\"members\": []}"));
    assert_eq!(resp.model, "claude-sonnet-4-5-20250929");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 100);
    assert_eq!(resp.output_tokens, 50);
}

#[test]
fn parse_filters_thinking_and_unknown_blocks() {
    let json = make_response(serde_json::json!([
        { "type": "thinking", "thinking": "Let me think..." },
        { "type": "some_future_type", "data": {} },
        { "type": "text", "text": "answer" }
    ]));
    let resp = parse_response(&json).unwrap();
    assert_eq!(resp.content, vec![ContentBlock::Text { text: "answer".into() }]);
}

#[test]
fn parse_null_stop_reason_defaults() {
    let json = serde_json::json!({
        "content": [],
        "model": "m",
        "stop_reason": null,
        "usage": { "input_tokens": 1, "output_tokens": 2 }
    })
    .to_string();
    assert_eq!(parse_response(&json).unwrap().stop_reason, "end_turn");
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

fn pdf() -> MediaSource {
    MediaSource::base64("application/pdf", "JVBERi0=")
}

fn png() -> MediaSource {
    MediaSource::base64("image/png", "iVBORw0=")
}

#[test]
fn shaping_moves_attachments_ahead_of_text() {
    let messages = vec![Message::user(vec![
        ContentBlock::Text { text: "family".into() },
        ContentBlock::Document { source: pdf() },
        ContentBlock::Text { text: "notes".into() },
        ContentBlock::Image { source: png() },
    ])];
    let shaped = shape_messages(&messages).unwrap();
    assert_eq!((shaped.images, shaped.documents), (1, 1));

    let json = serde_json::to_value(&shaped.messages).unwrap();
    let types: Vec<&str> = json[0]["content"].as_array().unwrap().iter().map(|b| b["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["document", "image", "text", "text"]);
    assert_eq!(json[0]["content"][2]["text"], "family");
    assert_eq!(json[0]["content"][0]["source"]["type"], "base64");
    assert_eq!(json[0]["content"][0]["source"]["media_type"], "application/pdf");
}

#[test]
fn shaping_rejects_image_types_the_api_cannot_decode() {
    let messages = vec![Message::user(vec![ContentBlock::Image {
        source: MediaSource::base64("image/heic", "AAAA"),
    }])];
    let err = shape_messages(&messages).unwrap_err();
    assert!(matches!(err, LlmError::UnsupportedMedia(ref t) if t == "image/heic"));
}

#[test]
fn shaping_rejects_non_pdf_documents() {
    let messages = vec![Message::user(vec![ContentBlock::Document {
        source: MediaSource::base64("text/csv", "YSxi"),
    }])];
    assert!(matches!(shape_messages(&messages), Err(LlmError::UnsupportedMedia(_))));
}

#[test]
fn shaping_accepts_media_type_case_insensitively() {
    let messages = vec![Message::user(vec![ContentBlock::Image {
        source: MediaSource::base64("image/JPEG", "/9j/"),
    }])];
    assert_eq!(shape_messages(&messages).unwrap().images, 1);
}

#[test]
fn shaping_drops_reply_only_blocks_and_empty_messages() {
    let messages = vec![
        Message { role: "assistant".into(), content: Content::Blocks(vec![ContentBlock::Thinking { thinking: "hm".into() }]) },
        Message { role: "user".into(), content: Content::Text("plain".into()) },
    ];
    let shaped = shape_messages(&messages).unwrap();
    assert_eq!(
        shaped.messages,
        vec![WireMessage { role: "user", content: vec![WireBlock::Text { text: "plain" }] }]
    );
}

#[test]
fn request_omits_empty_system() {
    let messages = vec![Message::user(vec![ContentBlock::Text { text: "family".into() }])];
    let shaped = shape_messages(&messages).unwrap();
    let body = MessagesRequest { model: "m", max_tokens: 10, system: "", messages: &shaped.messages };
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("system").is_none());
    assert_eq!(json["max_tokens"], 10);

    let body = MessagesRequest { system: "extract", ..body };
    assert_eq!(serde_json::to_value(&body).unwrap()["system"], "extract");
}
