//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Every authentication failure renders as a single opaque `401` with a
//! short reason; which internal check failed is only visible in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::sqlx_error_kind, kind::ErrorKind};
use platform::hashing::HashingError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token not found")]
    AccessTokenMissing,

    #[error("Access token has expired")]
    AccessTokenExpired,

    /// Bad signature, wrong algorithm or undecodable claims
    #[error("Invalid access token")]
    AccessTokenInvalid,

    #[error("Refresh token not found")]
    RefreshTokenMissing,

    /// No session for this token (forged, rotated away or deleted)
    #[error("Invalid refresh token")]
    RefreshTokenInvalid,

    #[error("Refresh token has expired")]
    RefreshTokenExpired,

    /// Authenticated, but the role is not allowed to run the operation
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Credential hashing failed
    #[error("Hashing error: {0}")]
    Hashing(#[from] HashingError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::AccessTokenMissing
            | AuthError::AccessTokenExpired
            | AuthError::AccessTokenInvalid
            | AuthError::RefreshTokenMissing
            | AuthError::RefreshTokenInvalid
            | AuthError::RefreshTokenExpired => ErrorKind::Unauthorized,
            AuthError::InsufficientPermissions => ErrorKind::Forbidden,
            AuthError::Database(e) => sqlx_error_kind(e),
            AuthError::Hashing(_)
            | AuthError::Configuration(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; their cause stays in the log.
    /// Storage errors go through the kernel's classification so transient
    /// outages render as `503`.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            other => match other.kind() {
                ErrorKind::InternalServerError => AppError::internal("Internal server error"),
                kind => AppError::new(kind, other.to_string()),
            },
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Credential hashing error");
            }
            AuthError::Configuration(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InsufficientPermissions => {
                tracing::warn!("Access denied: insufficient permissions");
            }
            AuthError::InvalidCredentials
            | AuthError::RefreshTokenInvalid
            | AuthError::RefreshTokenExpired => {
                tracing::warn!(reason = %self, "Authentication rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::AccessTokenExpired,
            TokenError::Malformed => AuthError::AccessTokenInvalid,
            TokenError::Encoding(msg) => AuthError::Internal(msg),
        }
    }
}
