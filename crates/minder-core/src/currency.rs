//! Display-only currency conversion via exchangerate.host
//!
//! Conversion never feeds the engine's comparisons; all rule evaluation
//! happens in the stored currency. Callers show an approximate converted
//! amount when a rate is available and simply skip the line when it is not.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

const CONVERT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
}

/// Exchange-rate client for display conversions
#[derive(Clone)]
pub struct CurrencyConverter {
    http_client: Client,
    base_url: String,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyConverter {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create against a specific endpoint (injectable for tests)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Convert an amount between currencies, rounded to 2 decimals
    ///
    /// Any failure at all (transport, non-2xx, malformed body, missing rate)
    /// yields None; the caller skips the converted display line.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Option<f64> {
        let url = format!("{}/convert", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .timeout(CONVERT_TIMEOUT)
            .query(&[
                ("from", from),
                ("to", to),
                ("amount", &amount.to_string()),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Conversion request failed");
            return None;
        }

        let body: ConvertResponse = response.json().await.ok()?;
        body.result.map(|r| (r * 100.0).round() / 100.0)
    }
}
