//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Field-level input validation failures.
///
/// Always recoverable; reported verbatim to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Username must be at most 32 characters")]
    UsernameTooLong,

    #[error("Username may only contain letters and digits separated by single dots")]
    UsernameInvalidFormat,

    #[error("Username cannot start or end with a dot")]
    UsernameEdgeDot,

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Name must be at least 2 characters")]
    NameTooShort,

    #[error("Name must be at most 32 characters")]
    NameTooLong,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password must include upper and lower case letters, a digit and a symbol")]
    PasswordMissingComplexity,
}

impl ValidationError {
    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::UsernameTooShort => "username_too_short",
            ValidationError::UsernameTooLong => "username_too_long",
            ValidationError::UsernameInvalidFormat => "invalid_username_format",
            ValidationError::UsernameEdgeDot => "username_cannot_start_or_end_with_dot",
            ValidationError::InvalidEmailFormat => "invalid_email_format",
            ValidationError::NameTooShort => "name_too_short",
            ValidationError::NameTooLong => "name_too_long",
            ValidationError::PasswordTooShort => "password_too_short",
            ValidationError::PasswordMissingComplexity => {
                "password_must_include_upper_lower_digit_special"
            }
        }
    }
}

/// Bearer token verification failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token payload is invalid")]
    PayloadInvalid,
}

/// Coarse failure classes used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Credential,
    Conflict,
    NotFound,
    Infrastructure,
}

/// Domain-specific errors for account operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed a field-level rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown username or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Supplied passwords do not match
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Username or email already registered
    #[error("Account already exists")]
    DuplicateAccount,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Failed to update account")]
    UpdateFailed,

    #[error("Failed to delete account")]
    DeleteFailed,

    #[error("Password hashing failed")]
    HashingFailure,

    /// Bearer token rejected
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Infrastructure failure outside of any specific operation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Classify the error into its reporting category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::Validation(_) | DomainError::PasswordMismatch => ErrorCategory::Validation,
            DomainError::InvalidCredentials | DomainError::Token(_) => ErrorCategory::Credential,
            DomainError::DuplicateAccount | DomainError::UsernameTaken | DomainError::EmailTaken => {
                ErrorCategory::Conflict
            }
            DomainError::AccountNotFound => ErrorCategory::NotFound,
            DomainError::UpdateFailed
            | DomainError::DeleteFailed
            | DomainError::HashingFailure
            | DomainError::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
