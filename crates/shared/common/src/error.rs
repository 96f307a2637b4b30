//! Unified error handling for the HTTP surface.
//!
//! Provides a single error type that converts domain failures into
//! Axum HTTP responses, hiding infrastructure details from clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, ErrorCategory, TokenError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken(TokenError),

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken(TokenError::Expired) => "TOKEN_EXPIRED",
            AppError::InvalidToken(_) => "TOKEN_INVALID",
            AppError::NotFound => "NOT_FOUND",
            AppError::RouteNotFound => "ROUTE_NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PasswordMismatch => "PASSWORD_MISMATCH",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::PasswordMismatch | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fine-grained reason for field-level failures
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AppError::Validation(err) => Some(err.code()),
            AppError::BadRequest(_) => Some("invalid_input"),
            _ => None,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidToken(kind) => {
                tracing::debug!("Token rejected: {}", kind);
                self.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                reason: self.reason(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err.category() {
            ErrorCategory::Infrastructure => AppError::Internal(err.to_string()),
            ErrorCategory::NotFound => AppError::NotFound,
            ErrorCategory::Conflict => AppError::conflict(match err {
                DomainError::UsernameTaken => "Username",
                DomainError::EmailTaken => "Email",
                _ => "Account",
            }),
            ErrorCategory::Credential => match err {
                DomainError::Token(kind) => AppError::InvalidToken(kind),
                _ => AppError::InvalidCredentials,
            },
            ErrorCategory::Validation => match err {
                DomainError::Validation(kind) => AppError::Validation(kind),
                _ => AppError::PasswordMismatch,
            },
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
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
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidToken(TokenError::InvalidSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("Email").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Validation(ValidationError::NameTooShort).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::PasswordMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_conversion() {
        assert!(matches!(
            AppError::from(DomainError::from(ValidationError::UsernameTooShort)),
            AppError::Validation(ValidationError::UsernameTooShort)
        ));
        assert!(matches!(
            AppError::from(DomainError::EmailTaken),
            AppError::Conflict(ref entity) if entity == "Email"
        ));
        assert!(matches!(
            AppError::from(DomainError::AccountNotFound),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(DomainError::HashingFailure),
            AppError::Internal(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::internal("connection reset")),
            AppError::Internal(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::PasswordMismatch),
            AppError::PasswordMismatch
        ));
        assert!(matches!(
            AppError::from(DomainError::Token(TokenError::Expired)),
            AppError::InvalidToken(TokenError::Expired)
        ));
    }

    #[test]
    fn test_status_follows_domain_category() {
        let errors = [
            DomainError::from(ValidationError::PasswordTooShort),
            DomainError::PasswordMismatch,
            DomainError::InvalidCredentials,
            DomainError::Token(TokenError::InvalidSignature),
            DomainError::DuplicateAccount,
            DomainError::UsernameTaken,
            DomainError::EmailTaken,
            DomainError::AccountNotFound,
            DomainError::UpdateFailed,
            DomainError::DeleteFailed,
            DomainError::HashingFailure,
            DomainError::internal("connection reset"),
        ];

        for err in errors {
            let expected = match err.category() {
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::Credential => StatusCode::UNAUTHORIZED,
                ErrorCategory::Conflict => StatusCode::CONFLICT,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let label = format!("{err:?}");
            assert_eq!(AppError::from(err).status(), expected, "{label}");
        }
    }

    #[test]
    fn test_token_codes_distinguish_expiry_only() {
        assert_eq!(AppError::InvalidToken(TokenError::Expired).code(), "TOKEN_EXPIRED");
        assert_eq!(AppError::InvalidToken(TokenError::Malformed).code(), "TOKEN_INVALID");
        assert_eq!(
            AppError::InvalidToken(TokenError::UnexpectedAlgorithm).code(),
            "TOKEN_INVALID"
        );
    }

    #[tokio::test]
    async fn test_validation_body_carries_reason() {
        let (status, body) = body_json(AppError::from(ValidationError::UsernameTooShort)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["reason"], "username_too_short");
    }

    #[tokio::test]
    async fn test_internal_body_hides_cause() {
        let (status, body) = body_json(AppError::internal("db password is hunter2")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("reason").is_none());
    }
}
