//! LLM types: provider-neutral structured generation request/response.
//!
//! Both providers accept the same `StructuredRequest` (system instruction,
//! user prompt, optional inline image, JSON response schema) and hand back
//! the raw JSON text the model produced. Validating that text is the
//! caller's job.

use mapkit::UploadedImage;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered but produced no usable text.
    #[error("empty model output (finish reason: {finish_reason})")]
    EmptyOutput { finish_reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::EmptyOutput { .. } => "E_EMPTY_OUTPUT",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// One structured-output generation call.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub system: String,
    pub prompt: String,
    pub image: Option<UploadedImage>,
    /// JSON Schema (lowercase `type` names) the output must follow.
    pub schema: serde_json::Value,
    pub max_tokens: u32,
}

/// Raw model output plus usage accounting.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// The JSON document produced by the model, unvalidated.
    pub text: String,
    pub model: String,
    pub finish_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM GENERATE TRAIT
// =============================================================================

/// Provider-neutral async trait for structured generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmGenerate: Send + Sync {
    /// Send one structured generation request to the provider.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider responds
    /// with an error status, or the response envelope is malformed.
    async fn generate(&self, request: &StructuredRequest) -> Result<StructuredResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
