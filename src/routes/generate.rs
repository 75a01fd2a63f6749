//! Generation route.
//!
//! `POST /api/generate` takes a `GenerationRequest` JSON body and answers
//! with a `GenerationResult` or an `ErrorBody`. The provider key never
//! leaves the server.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mapkit::{GenerationRequest, GenerationResult};
use tracing::{info, warn};

use crate::error::{ErrorBody, ErrorCode};
use crate::rate_limit::RateLimitError;
use crate::services::generation::{self, GenerationError};
use crate::state::AppState;

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// An error body paired with the HTTP status it is sent with.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn generation_error_to_status(err: &GenerationError) -> StatusCode {
    match err {
        GenerationError::EmptyInput | GenerationError::InvalidImage(_) => StatusCode::BAD_REQUEST,
        GenerationError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::Llm(_) | GenerationError::Parse(_) => StatusCode::BAD_GATEWAY,
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self { status: generation_error_to_status(&err), body: ErrorBody::from_error(&err) }
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        Self { status: StatusCode::TOO_MANY_REQUESTS, body: ErrorBody::from_error(&err) }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE { "E_PAYLOAD_TOO_LARGE" } else { "E_BAD_REQUEST" };
        Self { status, body: ErrorBody { code, message: rejection.body_text(), retryable: false } }
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// `POST /api/generate`: turn text and/or an image into a concept map.
pub async fn generate(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let Json(request) = payload.inspect_err(|e| warn!(%peer, status = %e.status(), "generate: body rejected"))?;

    if !request.has_input() {
        return Err(GenerationError::EmptyInput.into());
    }
    state
        .rate_limiter
        .check_and_record(peer.ip())
        .inspect_err(|e| warn!(%peer, error = %e, "generate: rate limited"))?;

    info!(%peer, "generate: accepted");
    let result = generation::generate(state.llm.as_deref(), &request)
        .await
        .inspect_err(|e| warn!(%peer, code = e.error_code(), error = %e, "generate: failed"))?;

    Ok(Json(result))
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
