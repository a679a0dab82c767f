//! HTTP servers
//!
//! Main surface (default port 8080):
//! - `/health/live`, `/health/ready` - Kubernetes probes
//! - `/info`, `/config` - identity and environment introspection
//! - `/chaos/*` - induced errors, delays and crashes
//! - `/load/*` - induced CPU and memory load
//! - `/metrics` - Prometheus exposition
//!
//! Metrics server (default port 9090) serves only `/metrics` and is not
//! itself counted.

pub mod chaos;
pub mod health;
pub mod info;
pub mod load;
pub mod metrics;
pub mod middleware;
pub mod shutdown;

pub use metrics::{create_metrics, RequestMetrics, SharedMetrics};
pub use shutdown::shutdown_signal;

use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};

use crate::env::EnvSource;
use crate::error::AppError;
use crate::fatal::FatalAbort;

/// State shared by every handler on the main surface
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<dyn EnvSource>,
    pub metrics: SharedMetrics,
}

impl AppState {
    pub fn new(env: Arc<dyn EnvSource>, metrics: SharedMetrics) -> Self {
        Self { env, metrics }
    }
}

impl FromRef<AppState> for SharedMetrics {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// Prometheus text exposition
async fn metrics_handler(State(metrics): State<SharedMetrics>) -> Result<Response, AppError> {
    let body = metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

/// Build the main router
///
/// `abort` is only handed to `/chaos/crash`.
///
/// Layer order, outermost first: request span, request counter, panic
/// catcher. The counter therefore sees the 500 produced for a panic.
pub fn build_router(state: AppState, abort: Arc<dyn FatalAbort>) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/info", get(info::info))
        .route("/config", get(info::config))
        .route("/chaos/error", get(chaos::error))
        .route("/chaos/timeout", get(chaos::timeout))
        .route("/chaos/crash", get(chaos::crash).with_state(abort))
        .route("/load/cpu", get(load::cpu))
        .route("/load/memory", get(load::memory))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn_with_state(
            metrics,
            middleware::track_requests,
        ))
        .layer(axum::middleware::from_fn(middleware::request_span))
}

/// Build the router for the dedicated metrics port
pub fn build_metrics_router(metrics: SharedMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serve `app` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn bind(port: u16) -> Result<TcpListener, std::io::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr).await
}

/// Run the main HTTP surface on the specified port
pub async fn run_app_server<F>(
    port: u16,
    state: AppState,
    abort: Arc<dyn FatalAbort>,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(port).await?;
    // Log after successful bind - server is actually listening
    info!(port = %port, "HTTP server listening");

    serve(listener, build_router(state, abort), shutdown).await
}

/// Run the Prometheus exposition server on the specified port
pub async fn run_metrics_server<F>(
    port: u16,
    metrics: SharedMetrics,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(port).await?;
    info!(port = %port, "Metrics server listening");

    serve(listener, build_metrics_router(metrics), shutdown).await
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_tests;

#[cfg(test)]
#[path = "router_test.rs"]
mod router_tests;
