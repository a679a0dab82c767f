//! Health check endpoints for Kubernetes probes
//!
//! - `/health/live` - Liveness: Is the process alive?
//! - `/health/ready` - Readiness: Should the pod receive traffic?

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::env::EnvSource;

/// Environment variable an operator flips to take the pod out of rotation
pub const READY_VAR: &str = "APP_READY";

/// Ready unless `APP_READY` is exactly `"false"`
///
/// Read on every call so the flag can be toggled without a restart.
pub fn is_ready(env: &dyn EnvSource) -> bool {
    env.var(READY_VAR).as_deref() != Some("false")
}

/// Liveness probe handler
///
/// Always returns 200 OK - if this responds, the process is alive.
pub async fn live() -> &'static str {
    "Alive"
}

/// Readiness probe handler
///
/// Returns 200 OK if ready, 503 Service Unavailable if not.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if is_ready(state.env.as_ref()) {
        (StatusCode::OK, "Ready").into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}
