//! Induced failures for resilience testing
//!
//! - `/chaos/error?code=N` - respond with status N
//! - `/chaos/timeout?seconds=N` - respond after N seconds
//! - `/chaos/crash` - abort the process

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::fatal::FatalAbort;

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
    pub code: i64,
}

#[derive(Debug, Deserialize)]
pub struct SecondsParams {
    pub seconds: u64,
}

/// Convert a caller-supplied code into a status the transport can send
///
/// Anything in 100..=999 is echoed, including non-standard codes.
pub fn induced_status(code: i64) -> Result<StatusCode, AppError> {
    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or(AppError::UnsupportedStatus(code))
}

pub async fn error(
    params: Result<Query<ErrorParams>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(ErrorParams { code }) = params?;
    let status = induced_status(code)?;
    warn!(code, "Returning induced error status");
    Ok(status)
}

pub async fn timeout(
    params: Result<Query<SecondsParams>, QueryRejection>,
) -> Result<String, AppError> {
    let Query(SecondsParams { seconds }) = params?;
    warn!(seconds, "Delaying response");

    // Yields the worker; other requests keep being served
    tokio::time::sleep(Duration::from_secs(seconds)).await;

    Ok(format!("Waited {}s", seconds))
}

/// Never returns; the response is never sent
pub async fn crash(State(abort): State<Arc<dyn FatalAbort>>) -> StatusCode {
    abort.abort("Chaos crash triggered")
}
