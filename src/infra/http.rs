//! Shared HTTP plumbing for the remote adapters.

use anyhow::Result;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Default per-call budget for backend reads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Health checks get a tighter budget.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
/// Seating optimization runs a genetic algorithm server-side.
pub const OPTIMIZE_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the client adapters share. Timeouts are applied per request so a
/// health check and a roster fetch on the same client get different budgets.
pub fn build_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// GET a JSON body with an explicit timeout.
///
/// Non-2xx statuses and timeouts become errors here; callers convert them to
/// the response envelope at the adapter boundary. A timed-out request is
/// aborted by the client, so it resolves instead of dangling.
pub async fn get_json(
    client: &reqwest::Client,
    url: reqwest::Url,
    timeout: Duration,
) -> Result<JsonValue> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("error")
        ));
    }

    response
        .json::<JsonValue>()
        .await
        .map_err(|e| anyhow::anyhow!("Invalid JSON response: {}", e))
}
