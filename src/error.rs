//! Stable error codes shared by services and the HTTP layer.
//!
//! Every service error exposes an `E_*` code and a retry hint. The route
//! layer turns these into `{ code, message, retryable }` JSON bodies so the
//! browser and CLI can branch on `code` without parsing messages.

use serde::Serialize;

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body returned for failed API requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}
