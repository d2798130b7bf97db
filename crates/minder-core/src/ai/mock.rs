//! Mock backend for testing
//!
//! Returns deterministic tips without a running generation service, and can
//! be configured to fail with a specific error for failure-path tests.

use async_trait::async_trait;

use super::{AdvisorBackend, AdvisorError};

/// Mock advisor backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// When set, every generation attempt fails with this error
    failure: Option<AdvisorError>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failure: None,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            failure: None,
        }
    }

    /// Create a mock backend whose generation always fails
    pub fn failing(error: AdvisorError) -> Self {
        Self {
            healthy: true,
            failure: Some(error),
        }
    }
}

#[async_trait]
impl AdvisorBackend for MockBackend {
    async fn generate_tip(&self, summary: &str) -> Result<String, AdvisorError> {
        if let Some(ref error) = self.failure {
            return Err(error.clone());
        }

        // Keyword-keyed canned tips so tests get stable, distinguishable text
        let tip = if summary.contains("exceeded") {
            "Consider setting a weekly cap for this category and reviewing large purchases."
        } else if summary.contains("close to") {
            "You are approaching this budget. Hold off on non-essential purchases this week."
        } else if summary.contains("spending") {
            "Review your largest recent expenses and look for one you can cut this month."
        } else {
            "Keep tracking your spending to stay on top of your finances."
        };

        Ok(tip.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
