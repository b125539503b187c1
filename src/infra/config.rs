//! Centralized configuration (environment variables + defaults).
//!
//! Selection must always be able to fall back to the Mock adapter, so unlike
//! backends with hard requirements these readers never panic on missing
//! values; absence is a signal, not an error.

/// Placeholder left in example `.env` files; a URL containing it is treated
/// as unconfigured.
pub const URL_PLACEHOLDER: &str = "YOUR_DEPLOYMENT_ID";

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "true").unwrap_or(false)
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Force the in-memory Mock adapter (`USE_MOCK_DATA=true`). Highest priority.
pub fn use_mock_data() -> bool {
    env_flag("USE_MOCK_DATA")
}

/// Select the Firestore adapter (`USE_FIRESTORE=true`).
pub fn use_firestore() -> bool {
    env_flag("USE_FIRESTORE")
}

/// Deployed Apps Script web-app URL for the Sheets adapter.
pub fn sheets_api_url() -> Option<String> {
    env_nonempty("SHEETS_API_URL")
}

/// True when a URL is empty or still carries the deployment placeholder.
pub fn is_placeholder_url(url: &str) -> bool {
    url.trim().is_empty() || url.contains(URL_PLACEHOLDER)
}

/// Tenant scope for Firestore document paths (`schools/{school_id}/students`).
pub fn school_id() -> String {
    env_nonempty("SCHOOL_ID").unwrap_or_else(|| "default".to_string())
}

/// Firebase project backing the Firestore REST endpoints.
pub fn firebase_project_id() -> Option<String> {
    env_nonempty("FIREBASE_PROJECT_ID")
}

/// Optional web API key appended to Firestore REST calls.
pub fn firebase_api_key() -> Option<String> {
    env_nonempty("FIREBASE_API_KEY")
}

/// Base URL of the external seating-optimization service. When unset, the
/// local heuristic is used instead.
pub fn optimization_api_url() -> Option<String> {
    env_nonempty("OPTIMIZATION_API_URL")
}
