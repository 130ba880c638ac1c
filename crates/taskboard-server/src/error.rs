use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskboard_core::ValidationError;
use taskboard_store::StoreError;
use tracing::{error, warn};

use crate::envelope::Envelope;
use crate::extract::MAX_BODY_BYTES;

// Operation contexts reported in the `error` field of a 500 envelope.
pub const FETCH_TASKS: &str = "Failed to fetch tasks";
pub const FETCH_TASK: &str = "Failed to fetch task";
pub const CREATE_TASK: &str = "Failed to create task";
pub const UPDATE_TASK: &str = "Failed to update task";
pub const DELETE_TASK: &str = "Failed to delete task";

/// Request failure, mapped onto an HTTP status and failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Task not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a store error with its operation.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> Envelope<()> {
        match self {
            Self::Validation(e) => Envelope::failure("Validation failed", Some(e.to_string())),
            Self::NotFound => Envelope::failure("Task not found", None),
            Self::RouteNotFound => Envelope::failure("Route not found", None),
            Self::PayloadTooLarge => Envelope::failure(
                "Payload too large",
                Some(format!("Request body exceeds {MAX_BODY_BYTES} bytes")),
            ),
            // The engine message is surfaced as-is.
            Self::Store { context, source } => {
                Envelope::failure(*context, Some(source.to_string()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store { context, source } => error!(context, error = %source, "store failure"),
            Self::Validation(e) => warn!(field = e.field(), error = %e, "validation failed"),
            Self::PayloadTooLarge => warn!(limit = MAX_BODY_BYTES, "request body too large"),
            Self::NotFound | Self::RouteNotFound => {}
        }
        (self.status(), Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::InvalidId).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        let store = ApiError::store(FETCH_TASKS)(StoreError::Database("disk I/O error".into()));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_envelope() {
        let json = serde_json::to_value(
            ApiError::from(ValidationError::TitleMissing).envelope(),
        )
        .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["message"], "Title is required");
    }

    #[test]
    fn store_envelope_surfaces_message() {
        let err = ApiError::store(CREATE_TASK)(StoreError::Database("database is locked".into()));
        let json = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(json["error"], "Failed to create task");
        assert_eq!(json["message"], "database error: database is locked");
    }

    #[test]
    fn not_found_envelope_has_no_message() {
        let json = serde_json::to_value(ApiError::NotFound.envelope()).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "Task not found"}));
    }
}
