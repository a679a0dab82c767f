use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("status code {0} cannot be sent over HTTP")]
    UnsupportedStatus(i64),

    #[error("failed to allocate {0}MB")]
    Allocation(u64),

    #[error("metrics encoding failed: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter(_) | AppError::UnsupportedStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Allocation(_) | AppError::Metrics(_) | AppError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::InvalidParameter(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
