//! Centralized error type for SnapSync Admin.
//!
//! Uses `thiserror` for the variants and converts directly into API responses.
//! The wire shape is `{ "error": "<human message>", "code": "<MACHINE_CODE>" }`.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Core application error type used by every handler.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    // === Auth errors ===
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    // === Resource errors ===
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    // === Validation errors ===
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    PayloadTooLarge { message: String },

    // === Upstream API ===
    #[error("Log service is not configured")]
    UpstreamUnavailable,

    #[error("{message}")]
    Upstream { message: String },

    // === Infrastructure errors ===
    /// A failed query. `action` is the client-facing message, e.g. "Failed to fetch events".
    #[error("{action}")]
    Database {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body sent to clients.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl SnapError {
    /// Shorthand for the 400 every form handler returns on absent fields.
    pub fn missing_fields() -> Self {
        Self::Validation {
            message: "Missing required fields".into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Database { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string for programmatic handling by clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for SnapError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't leak internal details to clients
        let message = match &self {
            SnapError::Database { action, source } => {
                tracing::error!(error = %source, "{action}");
                (*action).to_string()
            }
            SnapError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                "An internal error occurred".to_string()
            }
            SnapError::Upstream { message } => {
                tracing::warn!("Upstream error: {message}");
                message.clone()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: self.error_code(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl SnapError {
    /// Map an extractor failure by its status: oversized bodies stay 413, the rest are a 400.
    fn from_rejection(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge { message: text }
        } else {
            Self::validation(text)
        }
    }
}

impl From<JsonRejection> for SnapError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for SnapError {
    fn from(rejection: PathRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for SnapError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for SnapError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

/// A failure while streaming multipart fields, e.g. the body limit being hit mid-upload.
impl From<MultipartError> for SnapError {
    fn from(err: MultipartError) -> Self {
        Self::from_rejection(err.status(), err.body_text())
    }
}

/// Convenience type alias for Results using SnapError.
pub type SnapResult<T> = Result<T, SnapError>;

/// Attach the client-facing action message to a database result.
///
/// Constraint violations become client errors. Everything else is a 500
/// carrying `action` as its message.
pub trait DbResultExt<T> {
    fn context(self, action: &'static str) -> SnapResult<T>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, action: &'static str) -> SnapResult<T> {
        self.map_err(|source| {
            if let Some(db_err) = source.as_database_error() {
                if db_err.is_unique_violation() {
                    return SnapError::AlreadyExists {
                        resource: constraint_resource(db_err.constraint()),
                    };
                }
                if db_err.is_foreign_key_violation() {
                    return SnapError::validation("Referenced record does not exist");
                }
            }
            SnapError::Database { action, source }
        })
    }
}

/// Turn a constraint name like `users_email_key` into something readable.
fn constraint_resource(constraint: Option<&str>) -> String {
    match constraint {
        Some(c) if c.contains("email") => "Email".into(),
        Some(c) if c.contains("clerk_id") => "Clerk ID".into(),
        _ => "Record".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SnapError::missing_fields().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(SnapError::not_found("Event").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(SnapError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            SnapError::UpstreamUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_database_error_keeps_action_message() {
        let err = Err::<(), _>(sqlx::Error::PoolTimedOut)
            .context("Failed to fetch events")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch events");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let resp = SnapError::missing_fields().into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_payload_too_large() {
        let err = SnapError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "too big".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");

        let err = SnapError::from_rejection(StatusCode::UNPROCESSABLE_ENTITY, "bad".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_constraint_resource() {
        assert_eq!(constraint_resource(Some("users_email_key")), "Email");
        assert_eq!(constraint_resource(Some("users_clerk_id_key")), "Clerk ID");
        assert_eq!(constraint_resource(None), "Record");
    }
}
