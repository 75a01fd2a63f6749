use super::*;
use crate::llm::types::StructuredResponse;
use mapkit::UploadedImage;
use std::sync::Mutex;

// =========================================================================
// MockLlm
// =========================================================================

struct MockLlm {
    responses: Mutex<Vec<Result<StructuredResponse, LlmError>>>,
    seen: Mutex<Vec<StructuredRequest>>,
}

impl MockLlm {
    fn new(responses: Vec<Result<StructuredResponse, LlmError>>) -> Self {
        Self { responses: Mutex::new(responses), seen: Mutex::new(Vec::new()) }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(reply(text))])
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

fn reply(text: &str) -> StructuredResponse {
    StructuredResponse {
        text: text.into(),
        model: "mock".into(),
        finish_reason: "STOP".into(),
        input_tokens: 12,
        output_tokens: 34,
    }
}

#[async_trait::async_trait]
impl LlmGenerate for MockLlm {
    async fn generate(&self, request: &StructuredRequest) -> Result<StructuredResponse, LlmError> {
        self.seen.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() { Ok(reply("{}")) } else { responses.remove(0) }
    }
}

const PHOTOSYNTHESIS: &str =
    r#"{"diagramCode":"graph TD\nA[\"Sun\"] --> B[\"Plant\"]","questions":["Q1?","Q2?","Q3?"]}"#;

fn text_request(text: &str) -> GenerationRequest {
    GenerationRequest { text: text.into(), ..GenerationRequest::default() }
}

fn png() -> UploadedImage {
    UploadedImage::from_bytes(&[0x89, b'P', b'N', b'G'], "image/png").unwrap()
}

// =========================================================================
// prompts
// =========================================================================

#[test]
fn system_instruction_carries_mermaid_rules() {
    assert!(SYSTEM_INSTRUCTION.contains("graph TD"));
    assert!(SYSTEM_INSTRUCTION.contains("graph LR"));
    assert!(SYSTEM_INSTRUCTION.contains("semicolons"));
    assert!(SYSTEM_INSTRUCTION.contains("classDef"));
    assert!(SYSTEM_INSTRUCTION.contains("3 self-assessment questions"));
}

#[test]
fn user_prompt_names_topic_depth_and_style() {
    let request = GenerationRequest {
        text: "  Photosynthesis  ".into(),
        depth: Depth::Summary,
        style: DiagramStyle::Flow,
        image: None,
    };
    let prompt = build_user_prompt(&request);
    assert!(prompt.contains("content: Photosynthesis\n"));
    assert!(prompt.contains("flow concept map (LR)"));
    assert!(prompt.contains("summary depth"));
    assert!(prompt.contains("'diagramCode'"));
}

#[test]
fn user_prompt_for_image_only_refers_to_attachment() {
    let request = GenerationRequest { image: Some(png()), ..GenerationRequest::default() };
    let prompt = build_user_prompt(&request);
    assert!(prompt.contains("the attached image"));
    assert!(prompt.contains("hierarchical concept map (TD)"));
    assert!(prompt.contains("detailed depth"));
}

#[test]
fn schema_requires_diagram_and_questions() {
    let schema = response_schema();
    assert_eq!(schema["required"], json!(["diagramCode", "questions"]));
    assert_eq!(schema["properties"]["questions"]["items"]["type"], "string");
    assert_eq!(schema["properties"]["explanation"]["type"], "string");
}

// =========================================================================
// build_structured_request
// =========================================================================

#[test]
fn empty_input_is_rejected() {
    let err = build_structured_request(&text_request("   ")).unwrap_err();
    assert!(matches!(err, GenerationError::EmptyInput));
    assert_eq!(err.error_code(), "E_EMPTY_INPUT");
}

#[test]
fn non_image_mime_is_rejected() {
    let request = GenerationRequest {
        image: Some(UploadedImage { data: "aGk=".into(), mime_type: "application/pdf".into() }),
        ..GenerationRequest::default()
    };
    let err = build_structured_request(&request).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidImage(ImageError::UnsupportedType(_))));
}

#[test]
fn image_only_request_is_accepted() {
    let request = GenerationRequest { image: Some(png()), ..GenerationRequest::default() };
    let structured = build_structured_request(&request).unwrap();
    assert_eq!(structured.image, Some(png()));
    assert_eq!(structured.max_tokens, DEFAULT_GENERATION_MAX_TOKENS);
}

// =========================================================================
// generate
// =========================================================================

#[tokio::test]
async fn generate_returns_parsed_result() {
    let llm = MockLlm::replying(PHOTOSYNTHESIS);
    let result = generate(Some(&llm), &text_request("Photosynthesis")).await.unwrap();
    assert_eq!(result.diagram_code, "graph TD\nA[\"Sun\"] --> B[\"Plant\"]");
    assert_eq!(result.questions, vec!["Q1?", "Q2?", "Q3?"]);
    assert_eq!(result.explanation, None);

    let seen = llm.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].prompt.contains("Photosynthesis"));
    assert_eq!(seen[0].schema, response_schema());
}

#[tokio::test]
async fn generate_without_provider_is_not_configured() {
    let err = generate(None, &text_request("Cells")).await.unwrap_err();
    assert!(matches!(err, GenerationError::LlmNotConfigured));
}

#[tokio::test]
async fn empty_input_never_reaches_provider() {
    let llm = MockLlm::replying(PHOTOSYNTHESIS);
    let err = generate(Some(&llm), &GenerationRequest::default()).await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyInput));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn malformed_output_is_rejected() {
    let llm = MockLlm::replying("{\"diagramCode\": 42}");
    let err = generate(Some(&llm), &text_request("Cells")).await.unwrap_err();
    assert!(matches!(err, GenerationError::Parse(ParseError::Schema(_))));
    assert_eq!(err.error_code(), "E_INVALID_RESULT");
    assert!(!err.retryable());
}

#[tokio::test]
async fn extra_fields_are_rejected() {
    let llm = MockLlm::replying(r#"{"diagramCode":"graph TD","questions":[],"mood":"happy"}"#);
    let err = generate(Some(&llm), &text_request("Cells")).await.unwrap_err();
    assert!(matches!(err, GenerationError::Parse(_)));
}

#[tokio::test]
async fn blank_diagram_is_rejected() {
    let llm = MockLlm::replying(r#"{"diagramCode":"  ","questions":["Q?"]}"#);
    let err = generate(Some(&llm), &text_request("Cells")).await.unwrap_err();
    assert!(matches!(err, GenerationError::Parse(ParseError::EmptyDiagram)));
}

#[tokio::test]
async fn provider_failure_is_not_retried() {
    let llm = MockLlm::new(vec![
        Err(LlmError::ApiResponse { status: 503, body: "overloaded".into() }),
        Ok(reply(PHOTOSYNTHESIS)),
    ]);
    let err = generate(Some(&llm), &text_request("Cells")).await.unwrap_err();
    assert!(matches!(err, GenerationError::Llm(LlmError::ApiResponse { status: 503, .. })));
    assert!(err.retryable());
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn explanation_passes_through() {
    let llm = MockLlm::replying(r#"{"diagramCode":"graph LR\nA --> B","questions":[],"explanation":"Left to right."}"#);
    let request = GenerationRequest { style: DiagramStyle::Flow, ..text_request("Pipeline") };
    let result = generate(Some(&llm), &request).await.unwrap();
    assert_eq!(result.explanation.as_deref(), Some("Left to right."));
}

#[test]
fn expected_header_follows_style_direction() {
    assert_eq!(expected_header(DiagramStyle::Radial), "graph TD");
    assert_eq!(expected_header(DiagramStyle::Flow), "graph LR");
}
