#![recursion_limit = "256"]

mod error;
mod llm;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use llm::LlmGenerate;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize LLM client (non-fatal: /api/generate answers 503 if config missing).
    let llm: Option<Arc<dyn LlmGenerate>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), provider = ?client.provider(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, generation disabled");
            None
        }
    };

    let state = state::AppState::new(llm);
    let rate_limits = state.rate_limiter.config();
    tracing::info!(
        per_client = rate_limits.per_client_limit,
        global = rate_limits.global_limit,
        max_request_bytes = state.max_request_bytes,
        "request limits"
    );

    let app = routes::leptos_app(state).expect("leptos configuration");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "mapmind listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
