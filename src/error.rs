use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy for the service layer.
///
/// Every variant maps to one HTTP status class: bad caller input is 400,
/// a GitHub API error proxies the upstream status, a network fault is 503,
/// and anything else collapses to a generic 500 with no internal detail.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("GitHub API returned {status}: {body}")]
    GitHubApi { status: StatusCode, body: String },

    #[error("unable to reach GitHub API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ServiceError::InvalidArgument(msg) => {
                tracing::error!("Validation error: {msg}");
                (StatusCode::BAD_REQUEST, "Validation Error", msg.clone())
            }
            ServiceError::GitHubApi { status, .. } => {
                tracing::error!("GitHub API error: {self}");
                (
                    *status,
                    "GitHub API Error",
                    format!("Failed to fetch data from GitHub API: {self}"),
                )
            }
            ServiceError::Network(e) => {
                tracing::error!("Network error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Network Error",
                    "Unable to connect to GitHub API. Please check your internet connection."
                        .to_string(),
                )
            }
            ServiceError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }
            ServiceError::Internal(e) => {
                tracing::error!("Unexpected error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred. Please try again later.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
