//! Mock upstream Generative Language backend for integration tests
//!
//! Serves `POST /v1/models/{model}:generateContent` with canned candidate
//! responses, counts every request, and can fail selected models on demand.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Mock upstream backend that returns predictable responses
pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    request_count: AtomicU32,
    /// Models whose requests answer 500 with an upstream-style error body
    fail_models: HashSet<String>,
}

impl MockGemini {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(&[]).await
    }

    /// Start a mock server that fails requests for the named models
    pub async fn start_with_failing(models: &[&str]) -> anyhow::Result<Self> {
        Self::start_inner(models).await
    }

    async fn start_inner(fail_models: &[&str]) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            request_count: AtomicU32::new(0),
            fail_models: fail_models.iter().map(|m| (*m).to_owned()).collect(),
        });

        let app = Router::new()
            .route("/v1/models/{call}", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    ///
    /// Includes `/v1` since the relay appends `/models/{model}:generateContent`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of generation requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Handle `POST /v1/models/{model}:generateContent`
async fn handle_generate(
    State(state): State<Arc<MockGeminiState>>,
    Path(call): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    // The path segment carries both the model and the verb
    let model = call.split(':').next().unwrap_or_default().to_owned();

    // The relay must always send a prompt part and an inline image part
    let parts = &body["contents"][0]["parts"];
    if parts[0].get("text").is_none() || parts[1].get("inline_data").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "mock upstream: malformed contents"
                }
            })),
        )
            .into_response();
    }

    if state.fail_models.contains(&model) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": {
                    "code": 500,
                    "message": format!("mock upstream failure for {model}")
                }
            })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": format!("mock response from {model}") }]
            },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}
