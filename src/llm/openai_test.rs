use super::*;
use mapkit::UploadedImage;
use serde_json::json;

fn request(image: Option<UploadedImage>) -> StructuredRequest {
    StructuredRequest {
        system: "Return a concept map.".into(),
        prompt: "Topic: Rust ownership".into(),
        image,
        schema: json!({ "type": "object", "properties": { "diagramCode": { "type": "string" } } }),
        max_tokens: 1024,
    }
}

// ===== request building =====

#[test]
fn text_only_request_uses_plain_string_content() {
    let req = request(None);
    let messages = build_messages(&req);
    let value = serde_json::to_value(&messages).unwrap();
    assert_eq!(
        value,
        json!([
            { "role": "system", "content": "Return a concept map." },
            { "role": "user", "content": "Topic: Rust ownership" }
        ])
    );
}

#[test]
fn image_request_sends_data_url_part() {
    let req = request(Some(UploadedImage { data: "QUJD".into(), mime_type: "image/jpeg".into() }));
    let value = serde_json::to_value(build_messages(&req)).unwrap();
    assert_eq!(
        value[1]["content"],
        json!([
            { "type": "text", "text": "Topic: Rust ownership" },
            { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,QUJD" } }
        ])
    );
}

#[test]
fn blank_system_prompt_is_omitted() {
    let mut req = request(None);
    req.system = "  ".into();
    let messages = build_messages(&req);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, "user");
}

#[test]
fn response_format_wraps_schema_non_strict() {
    let req = request(None);
    let messages = build_messages(&req);
    let body = CcRequest {
        model: "gpt-4o",
        max_tokens: req.max_tokens,
        messages: &messages,
        response_format: ResponseFormat::json_schema(&req.schema),
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["response_format"]["type"], "json_schema");
    assert_eq!(value["response_format"]["json_schema"]["name"], "concept_map");
    assert_eq!(value["response_format"]["json_schema"]["strict"], false);
    assert_eq!(value["response_format"]["json_schema"]["schema"], req.schema);
    assert_eq!(value["max_tokens"], 1024);
}

// ===== response parsing =====

#[test]
fn parse_text_response() {
    let json = json!({
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "{\"diagramCode\":\"graph TD\"}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.text, "{\"diagramCode\":\"graph TD\"}");
    assert_eq!(resp.model, "gpt-4o-2024-08-06");
    assert_eq!(resp.finish_reason, "stop");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn parse_missing_choices() {
    let json = json!({ "model": "gpt-4o", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

#[test]
fn parse_null_content_is_empty_output() {
    let json = json!({
        "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "length" }]
    })
    .to_string();
    let err = parse_chat_completions_response(&json).unwrap_err();
    assert!(matches!(err, LlmError::EmptyOutput { finish_reason } if finish_reason == "length"));
}

#[test]
fn parse_refusal_is_empty_output() {
    let json = json!({
        "choices": [{
            "message": { "role": "assistant", "content": null, "refusal": "I can't help with that." },
            "finish_reason": "stop"
        }]
    })
    .to_string();
    let err = parse_chat_completions_response(&json).unwrap_err();
    assert!(matches!(err, LlmError::EmptyOutput { finish_reason } if finish_reason.starts_with("refusal")));
}
