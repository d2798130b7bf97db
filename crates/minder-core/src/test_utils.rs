//! Test utilities for minder-core
//!
//! Provides a mock chat-completions server so the generated-tip path can be
//! exercised without a live advisor service, including the failure statuses
//! the composer must translate into typed errors.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// How the mock server answers completion requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockMode {
    /// Answer with a canned tip keyed off the user message
    Succeed,
    /// Answer every completion with this HTTP status
    Fail(u16),
    /// Answer 200 with an empty completion
    Empty,
}

/// Mock chat-completions server for testing
pub struct MockAdvisorServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAdvisorServer {
    /// Start a mock server that answers every completion successfully
    pub async fn start() -> Self {
        Self::start_with_mode(MockMode::Succeed).await
    }

    /// Start a mock server that fails every completion with `status`
    /// (e.g. 401 for auth, 429 for rate limiting)
    pub async fn start_failing(status: u16) -> Self {
        Self::start_with_mode(MockMode::Fail(status)).await
    }

    /// Start a mock server that returns empty completions
    pub async fn start_empty() -> Self {
        Self::start_with_mode(MockMode::Empty).await
    }

    async fn start_with_mode(mode: MockMode) -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(mode);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAdvisorServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        data: vec![ModelInfo {
            id: "gpt-3.5-turbo".to_string(),
        }],
    })
}

/// Chat completions endpoint
async fn handle_completion(
    State(mode): State<MockMode>,
    Json(request): Json<CompletionRequest>,
) -> impl IntoResponse {
    match mode {
        MockMode::Fail(status) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(serde_json::json!({"error": "mock failure"}))).into_response()
        }
        MockMode::Empty => completion_body(&request.model, "").into_response(),
        MockMode::Succeed => {
            let user_content = request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == "user")
                .map(|m| m.content.as_str())
                .unwrap_or_default();

            // Stable, distinguishable canned tips keyed off the summary
            let tip = if user_content.contains("exceeded") {
                "Try a weekly cap on this category until the month resets."
            } else if user_content.contains("close to") {
                "You are nearly at this budget. Pause non-essentials for a few days."
            } else if user_content.contains("spending") {
                "Your outflow tops your income. Trim one large recent expense."
            } else {
                "Keep an eye on your spending this month."
            };

            completion_body(&request.model, tip).into_response()
        }
    }
}

fn completion_body(model: &str, content: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    }))
}

#[derive(Debug, Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    id: String,
}
