//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error response is a JSON body:
//!
//! ```json
//! { "message": "Invalid question data", "errors": [{ "field": "title", "message": "is required" }] }
//! ```
//!
//! `errors` is present only for validation failures.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Generic message for a rejected account payload.
pub const INVALID_USER: &str = "Invalid user data";
/// Generic message for a rejected question payload.
pub const INVALID_QUESTION: &str = "Invalid question data";
/// Generic message for a rejected comment payload.
pub const INVALID_COMMENT: &str = "Invalid comment data";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The payload failed validation.
    #[error("{message}: {errors}")]
    Validation {
        message: &'static str,
        errors: ValidationErrors,
    },

    /// Store operation failed unexpectedly.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller identity is missing or unknown.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a store error, labelling validation failures with `message`.
    ///
    /// ```rust,ignore
    /// store.accounts().create(&draft).map_err(AppError::invalid(INVALID_USER))?;
    /// ```
    pub fn invalid(message: &'static str) -> impl Fn(StoreError) -> Self {
        move |err| match err {
            StoreError::Validation(errors) => Self::Validation { message, errors },
            other => Self::Store(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::invalid("Invalid data")(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else if let Self::Validation { errors, .. } = &self {
            tracing::debug!(fields = %errors, "Rejected payload");
        }

        let status = match &self {
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Validation { message, errors } => ErrorBody {
                message,
                errors: Some(errors),
            },
            Self::Store(_) | Self::Internal(_) => ErrorBody {
                message: "Internal server error",
                errors: None,
            },
            Self::NotFound(message) | Self::Unauthorized(message) | Self::BadRequest(message) => {
                ErrorBody {
                    message,
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the resolved caller.
pub fn set_sentry_user(account_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Question not found".to_string());
        assert_eq!(err.to_string(), "Not found: Question not found");

        let err = AppError::BadRequest("No accounts found".to_string());
        assert_eq!(err.to_string(), "Bad request: No accounts found");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::LockPoisoned)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "is required");
        let err = AppError::invalid(INVALID_QUESTION)(StoreError::Validation(errors));

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid question data");
        assert_eq!(body["errors"][0]["field"], "title");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (_, body) = body_json(AppError::Internal("lock poisoned at 0x1".to_string())).await;
        assert_eq!(body, serde_json::json!({ "message": "Internal server error" }));
    }
}
