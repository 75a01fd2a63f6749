//! Generation service: user input → structured LLM call → validated concept map.
//!
//! DESIGN
//! ======
//! One request, one provider call, no retry. The instruction prompt is fixed;
//! only the topic, depth, and style vary per request. The provider's JSON is
//! treated as untrusted and parsed strictly into `GenerationResult`, so a
//! malformed answer surfaces as an error instead of a half-rendered map.

use std::sync::OnceLock;

use mapkit::{Depth, DiagramStyle, GenerationRequest, GenerationResult, ImageError, ParseError};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::llm::LlmGenerate;
use crate::llm::types::{LlmError, StructuredRequest};

const DEFAULT_GENERATION_MAX_TOKENS: u32 = 8192;

fn generation_max_tokens() -> u32 {
    static VALUE: OnceLock<u32> = OnceLock::new();
    *VALUE.get_or_init(|| {
        std::env::var("GENERATION_MAX_TOKENS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_GENERATION_MAX_TOKENS)
    })
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request has neither text nor an image")]
    EmptyInput,
    #[error("invalid image: {0}")]
    InvalidImage(#[from] ImageError),
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("model output rejected: {0}")]
    Parse(#[from] ParseError),
}

impl ErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E_EMPTY_INPUT",
            Self::InvalidImage(_) => "E_INVALID_IMAGE",
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Llm(_) => "E_LLM_ERROR",
            Self::Parse(_) => "E_INVALID_RESULT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm(e) if e.retryable())
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

const SYSTEM_INSTRUCTION: &str = "\
You are an expert in information architecture and visual design. Your goal is \
to produce concept maps that render correctly with Mermaid through Kroki.

MERMAID SYNTAX RULES:
1. The first line is exactly 'graph TD' (hierarchical or radial maps) or 'graph LR' (flow maps), with nothing else on it.
2. Never use semicolons to separate nodes or statements.
3. Put a real line break after every connection and every style definition. One statement per line.
4. Always wrap node labels in double quotes, e.g. A[\"Main idea\"] --> B[\"Sub-concept\"].
5. Each connection goes on its own line, e.g.
   graph TD
   A[\"Root\"] --> B[\"Child 1\"]
   B[\"Child 1\"] --> C[\"Grandchild\"]

DESIGN RULES:
- Concepts are short (at most 5 words).
- Use clear link labels (short verbs on the arrows).
- Distinguish levels with colours using classDef lines at the end of the code, one per line, e.g.
  classDef root fill:#f96,stroke:#333,stroke-width:4px
  classDef level1 fill:#69f,stroke:#333,stroke-width:2px
  classDef level2 fill:#9f6,stroke:#333,stroke-width:1px

SELF-ASSESSMENT:
- Include 3 self-assessment questions based strictly on the logic of the generated map.";

/// Build the per-request user prompt.
#[must_use]
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    let topic = request.text.trim();
    let topic = if topic.is_empty() { "the attached image" } else { topic };
    format!(
        "Design a {style} concept map ({direction}) with {depth} depth about the following content: {topic}\n\
         {depth_hint}\n\
         REMEMBER: no semicolons, a real line break between every node, and labels in double quotes.\n\
         Return JSON with 'diagramCode' (Mermaid source with \\n line breaks) and 'questions'.",
        style = request.style.as_str(),
        direction = request.style.direction(),
        depth = request.depth.as_str(),
        depth_hint = depth_hint(request.depth),
    )
}

fn depth_hint(depth: Depth) -> &'static str {
    match depth {
        Depth::Summary => "Keep only the main ideas: a handful of nodes, one or two levels.",
        Depth::Detailed => "Cover the main ideas and their supporting details across several levels.",
    }
}

/// JSON Schema for the model output. Lowercase type names; providers adapt it.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "diagramCode": {
                "type": "string",
                "description": "Mermaid source with real \\n line breaks, no semicolons, quoted labels."
            },
            "questions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "3 self-assessment questions."
            },
            "explanation": { "type": "string" }
        },
        "required": ["diagramCode", "questions"]
    })
}

// =============================================================================
// GENERATE
// =============================================================================

/// Build the provider request for a validated user request.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyInput`] or [`GenerationError::InvalidImage`].
pub fn build_structured_request(request: &GenerationRequest) -> Result<StructuredRequest, GenerationError> {
    if !request.has_input() {
        return Err(GenerationError::EmptyInput);
    }
    if let Some(image) = &request.image {
        image.validate()?;
    }

    Ok(StructuredRequest {
        system: SYSTEM_INSTRUCTION.to_owned(),
        prompt: build_user_prompt(request),
        image: request.image.clone(),
        schema: response_schema(),
        max_tokens: generation_max_tokens(),
    })
}

/// Run one generation against the configured provider.
///
/// # Errors
///
/// Returns [`GenerationError`] if the input is empty or invalid, no provider
/// is configured, the provider call fails, or its output fails validation.
pub async fn generate(
    llm: Option<&dyn LlmGenerate>,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    let structured = build_structured_request(request)?;
    let llm = llm.ok_or(GenerationError::LlmNotConfigured)?;

    info!(
        text_len = request.text.len(),
        has_image = request.image.is_some(),
        depth = request.depth.as_str(),
        style = request.style.as_str(),
        "generation: request received"
    );

    let response = llm.generate(&structured).await.map_err(|e| {
        warn!(error = %e, "generation: provider call failed");
        GenerationError::from(e)
    })?;

    info!(
        model = %response.model,
        finish_reason = %response.finish_reason,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "generation: provider responded"
    );

    let result = GenerationResult::from_json(&response.text).map_err(|e| {
        warn!(error = %e, output_len = response.text.len(), "generation: output rejected");
        GenerationError::from(e)
    })?;

    let header = expected_header(request.style);
    if !result.diagram_code.trim_start().starts_with(&header) {
        warn!(expected = %header, "generation: diagram header differs from requested style");
    }

    info!(
        diagram_len = result.diagram_code.len(),
        questions = result.questions.len(),
        "generation: complete"
    );
    Ok(result)
}

#[must_use]
fn expected_header(style: DiagramStyle) -> String {
    format!("graph {}", style.direction())
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;
