//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error since generation is only
//! triggered from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get a `Result` with a diagnostic string. The page logs it and
//! shows one generic message; the detail is never shown to the user.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use mapkit::{GenerationRequest, GenerationResult};

pub const GENERATE_ENDPOINT: &str = "/api/generate";

#[cfg(any(test, feature = "hydrate"))]
fn generate_failed_message(status: u16, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        code: String,
        message: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => format!("generate failed: {status} {}: {}", err.code, err.message),
        Err(_) => format!("generate failed: {status}"),
    }
}

/// Parse a successful response body. The same strict rules as the server apply.
#[cfg(any(test, feature = "hydrate"))]
fn parse_generate_response(body: &str) -> Result<GenerationResult, String> {
    GenerationResult::from_json(body).map_err(|e| e.to_string())
}

/// Send a generation request to `POST /api/generate`.
///
/// # Errors
///
/// Returns an error string if the request fails, the server answers with a
/// non-2xx status, or the body is not a valid `GenerationResult`.
pub async fn generate(request: &GenerationRequest) -> Result<GenerationResult, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(GENERATE_ENDPOINT)
            .json(request)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| e.to_string())?;
        if !(200..300).contains(&status) {
            return Err(generate_failed_message(status, &body));
        }
        parse_generate_response(&body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err("not available on server".to_owned())
    }
}
