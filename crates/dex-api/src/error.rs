use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dex_core::{DexError, StoreError};
use tokio::task::JoinError;
use tracing::{error, warn};

/// Failure of one request. Store errors carry the route's stable message for
/// the client; the underlying cause is only logged.
#[derive(Debug)]
pub enum ApiError {
    InvalidId,
    NotFound,
    Failed {
        message: &'static str,
        cause: StoreError,
    },
    Task(JoinError),
}

impl ApiError {
    pub fn from_dex(err: DexError, failure: &'static str) -> Self {
        match err {
            DexError::InvalidArgument(_) => ApiError::InvalidId,
            DexError::NotFound(_) => ApiError::NotFound,
            DexError::Store(cause @ StoreError::Decode(_)) => ApiError::Failed {
                message: "Failed to decode Pokemon data",
                cause,
            },
            DexError::Store(cause) => ApiError::Failed {
                message: failure,
                cause,
            },
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Task(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, "Invalid Pokemon ID"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Pokemon not found"),
            ApiError::Failed { message, cause } => {
                warn!(error = %cause, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, *message)
            }
            ApiError::Task(e) => {
                error!(error = %e, "request task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
