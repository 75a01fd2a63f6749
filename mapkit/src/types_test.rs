use super::*;

// =============================================================================
// GenerationResult::from_json
// =============================================================================

#[test]
fn from_json_accepts_required_fields() {
    let raw = r#"{"diagramCode":"graph TD\nA[\"Sun\"] --> B[\"Plant\"]","questions":["Q1?","Q2?","Q3?"]}"#;
    let result = GenerationResult::from_json(raw).unwrap();
    assert_eq!(result.diagram_code, "graph TD\nA[\"Sun\"] --> B[\"Plant\"]");
    assert_eq!(result.questions, vec!["Q1?", "Q2?", "Q3?"]);
    assert!(result.explanation.is_none());
}

#[test]
fn from_json_accepts_optional_explanation() {
    let raw = r#"{"diagramCode":"graph LR\nA --> B","questions":[],"explanation":"Left to right."}"#;
    let result = GenerationResult::from_json(raw).unwrap();
    assert_eq!(result.explanation.as_deref(), Some("Left to right."));
}

#[test]
fn from_json_trims_surrounding_whitespace() {
    let raw = "\n  {\"diagramCode\":\"graph TD\",\"questions\":[]}  \n";
    assert!(GenerationResult::from_json(raw).is_ok());
}

#[test]
fn from_json_rejects_missing_questions() {
    let err = GenerationResult::from_json(r#"{"diagramCode":"graph TD"}"#).unwrap_err();
    assert!(matches!(err, ParseError::Schema(_)));
}

#[test]
fn from_json_rejects_missing_diagram() {
    let err = GenerationResult::from_json(r#"{"questions":["Q?"]}"#).unwrap_err();
    assert!(matches!(err, ParseError::Schema(_)));
}

#[test]
fn from_json_rejects_unknown_fields() {
    let raw = r#"{"diagramCode":"graph TD","questions":[],"confidence":0.9}"#;
    let err = GenerationResult::from_json(raw).unwrap_err();
    assert!(matches!(err, ParseError::Schema(_)));
}

#[test]
fn from_json_rejects_wrong_question_type() {
    let raw = r#"{"diagramCode":"graph TD","questions":[1,2,3]}"#;
    assert!(GenerationResult::from_json(raw).is_err());
}

#[test]
fn from_json_rejects_blank_diagram() {
    let err = GenerationResult::from_json(r#"{"diagramCode":"   ","questions":[]}"#).unwrap_err();
    assert!(matches!(err, ParseError::EmptyDiagram));
}

#[test]
fn from_json_rejects_non_json() {
    assert!(GenerationResult::from_json("Here is your diagram: graph TD").is_err());
    assert!(GenerationResult::from_json("").is_err());
}

#[test]
fn result_serializes_camel_case_without_absent_explanation() {
    let result = GenerationResult { diagram_code: "graph TD".into(), questions: vec!["Q?".into()], explanation: None };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({ "diagramCode": "graph TD", "questions": ["Q?"] }));
}

// =============================================================================
// GenerationRequest
// =============================================================================

#[test]
fn request_without_text_or_image_has_no_input() {
    let req = GenerationRequest { text: "   \n".into(), ..GenerationRequest::default() };
    assert!(!req.has_input());
}

#[test]
fn request_with_only_image_has_input() {
    let image = UploadedImage { data: "aGk=".into(), mime_type: "image/png".into() };
    let req = GenerationRequest { image: Some(image), ..GenerationRequest::default() };
    assert!(req.has_input());
    assert_eq!(req.input_summary(), IMAGE_ONLY_SUMMARY);
}

#[test]
fn request_summary_is_trimmed_text() {
    let req = GenerationRequest { text: "  Photosynthesis \n".into(), ..GenerationRequest::default() };
    assert_eq!(req.input_summary(), "Photosynthesis");
}

#[test]
fn request_defaults_options_when_absent() {
    let req: GenerationRequest = serde_json::from_str(r#"{"text":"Cells"}"#).unwrap();
    assert_eq!(req.depth, Depth::Detailed);
    assert_eq!(req.style, DiagramStyle::Hierarchical);
    assert!(req.image.is_none());
}

#[test]
fn request_wire_shape_uses_lowercase_options() {
    let req = GenerationRequest {
        text: "Cells".into(),
        image: Some(UploadedImage { data: "aGk=".into(), mime_type: "image/jpeg".into() }),
        depth: Depth::Summary,
        style: DiagramStyle::Radial,
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "text": "Cells",
            "image": { "data": "aGk=", "mimeType": "image/jpeg" },
            "depth": "summary",
            "style": "radial"
        })
    );
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn depth_parses_and_displays() {
    for depth in Depth::ALL {
        assert_eq!(depth.as_str().parse::<Depth>().unwrap(), depth);
    }
    let err = "deep".parse::<Depth>().unwrap_err();
    assert_eq!(err.to_string(), "unknown depth 'deep'");
}

#[test]
fn style_parses_and_picks_direction() {
    for style in DiagramStyle::ALL {
        assert_eq!(style.to_string().parse::<DiagramStyle>().unwrap(), style);
    }
    assert_eq!(DiagramStyle::Flow.direction(), "LR");
    assert_eq!(DiagramStyle::Hierarchical.direction(), "TD");
    assert_eq!(DiagramStyle::Radial.direction(), "TD");
}

// =============================================================================
// UploadedImage
// =============================================================================

#[test]
fn from_data_url_splits_mime_and_payload() {
    let image = UploadedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.data, "iVBORw0KGgo=");
    assert_eq!(image.data_url(), "data:image/png;base64,iVBORw0KGgo=");
}

#[test]
fn from_data_url_rejects_non_images() {
    let err = UploadedImage::from_data_url("data:application/pdf;base64,JVBERi0=").unwrap_err();
    assert_eq!(err, ImageError::UnsupportedType("application/pdf".into()));
}

#[test]
fn from_data_url_rejects_plain_urls_and_empty_payloads() {
    assert_eq!(UploadedImage::from_data_url("https://example.test/a.png"), Err(ImageError::NotDataUrl));
    assert_eq!(UploadedImage::from_data_url("data:image/png,abc"), Err(ImageError::NotDataUrl));
    assert_eq!(UploadedImage::from_data_url("data:image/png;base64,"), Err(ImageError::Empty));
}

#[test]
fn from_bytes_encodes_standard_base64() {
    let image = UploadedImage::from_bytes(b"hi", "image/gif").unwrap();
    assert_eq!(image.data, "aGk=");
    assert!(image.validate().is_ok());
}

#[test]
fn validate_rejects_corrupt_base64() {
    let image = UploadedImage { data: "%%%".into(), mime_type: "image/png".into() };
    assert_eq!(image.validate(), Err(ImageError::InvalidBase64));
}

#[test]
fn supported_mime_requires_image_subtype() {
    assert!(is_supported_mime("image/webp"));
    assert!(!is_supported_mime("image/"));
    assert!(!is_supported_mime("text/plain"));
}
