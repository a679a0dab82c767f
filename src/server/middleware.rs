//! Request middleware
//!
//! - `track_requests` counts every request by method, path and final status.
//! - `request_span` wraps the request in a tracing span keyed by a UUID v4 so
//!   all logs emitted while handling it can be correlated.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use super::metrics::SharedMetrics;

/// Increment `devops_helper_requests_total` once the downstream service has
/// produced a response.
///
/// Must sit outside the panic-catching layer so that a panicking handler is
/// still counted, with status 500.
pub async fn track_requests(
    State(metrics): State<SharedMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    metrics.record_request(method.as_str(), &path, response.status().as_u16());
    response
}

/// Outermost layer: create the request span and log completion
pub async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_request_span_leaves_response_untouched() {
        let app = Router::new()
            .route(
                "/teapot",
                get(|| async { (StatusCode::IM_A_TEAPOT, [("x-brewed", "yes")], "short") }),
            )
            .layer(axum::middleware::from_fn(request_span));

        let response = app
            .oneshot(HttpRequest::get("/teapot").body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible");

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()["x-brewed"], "yes");
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        assert_eq!(&body[..], b"short");
    }
}
