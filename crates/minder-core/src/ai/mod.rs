//! Pluggable advisor backend abstraction
//!
//! The advisor is the external text-generation service that rewrites a
//! finding summary into a natural-language tip. Everything speaks the OpenAI
//! chat-completions API shape.
//!
//! # Architecture
//!
//! - `AdvisorBackend` trait: the interface for tip generation
//! - `AdvisorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `ADVISOR_BACKEND`: Backend to use (openai_compatible, mock). Default: openai_compatible
//! - `ADVISOR_HOST`: Server URL (required for openai_compatible)
//! - `ADVISOR_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `ADVISOR_API_KEY`: Bearer token if the server requires one (optional)

mod mock;
mod openai_compatible;

pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;
use thiserror::Error;

/// A failed generation attempt
///
/// Caught entirely inside the tip composer: these values surface in the cycle
/// report, never as persisted notification content and never as a cycle abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("authentication rejected by the generation service")]
    Auth,

    #[error("generation service rate limit hit")]
    RateLimited,

    #[error("generation request timed out")]
    Timeout,

    #[error("generation service returned status {status}")]
    Api { status: u16 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("generation service returned an empty completion")]
    Empty,
}

/// Trait defining the interface for advisor backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Turn a one-line finding summary into a natural-language tip
    async fn generate_tip(&self, summary: &str) -> std::result::Result<String, AdvisorError>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete advisor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AdvisorClient {
    /// Any server implementing the OpenAI chat-completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AdvisorClient {
    /// Create an advisor client from environment variables
    ///
    /// Checks `ADVISOR_BACKEND` to determine which backend to use:
    /// - `openai_compatible` (default): Uses ADVISOR_HOST / ADVISOR_MODEL / ADVISOR_API_KEY
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set; the
    /// engine then composes every tip from templates.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("ADVISOR_BACKEND").unwrap_or_else(|_| "openai_compatible".to_string());

        match backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" => {
                OpenAICompatibleBackend::from_env().map(AdvisorClient::OpenAICompatible)
            }
            "mock" => Some(AdvisorClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown ADVISOR_BACKEND, falling back to openai_compatible");
                OpenAICompatibleBackend::from_env().map(AdvisorClient::OpenAICompatible)
            }
        }
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai_compatible(host: &str, model: &str) -> Self {
        AdvisorClient::OpenAICompatible(OpenAICompatibleBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AdvisorClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AdvisorBackend for AdvisorClient {
    async fn generate_tip(&self, summary: &str) -> std::result::Result<String, AdvisorError> {
        match self {
            AdvisorClient::OpenAICompatible(b) => b.generate_tip(summary).await,
            AdvisorClient::Mock(b) => b.generate_tip(summary).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdvisorClient::OpenAICompatible(b) => b.health_check().await,
            AdvisorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AdvisorClient::OpenAICompatible(b) => b.model(),
            AdvisorClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AdvisorClient::OpenAICompatible(b) => b.host(),
            AdvisorClient::Mock(b) => b.host(),
        }
    }
}
