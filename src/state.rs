//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the optional generative-model client and the request rate limiter.
//! Nothing about a user's maps lives here: history stays in the browser.

use std::sync::Arc;

use crate::llm::LlmGenerate;
use crate::rate_limit::RateLimiter;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmGenerate>>,
    /// In-memory rate limiter for generation requests.
    pub rate_limiter: RateLimiter,
    /// Upper bound on `/api/generate` request bodies, in bytes.
    pub max_request_bytes: usize,
}

pub const DEFAULT_MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmGenerate>>) -> Self {
        let max_request_bytes = std::env::var("MAX_REQUEST_BYTES")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_REQUEST_BYTES);
        Self { llm, rate_limiter: RateLimiter::new(), max_request_bytes }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
