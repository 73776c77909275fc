//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from infrastructure errors to [`AppError`]
//! and the HTTP rendering of [`AppError`].

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Which client-facing kind a storage failure maps to
///
/// Pool exhaustion and PostgreSQL class 53 / 57 (resource exhaustion,
/// operator intervention) are transient; everything else is internal.
#[cfg(feature = "sqlx")]
pub fn sqlx_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db_err) => {
            let unavailable = db_err
                .code()
                .map(|code| code.starts_with("53") || code.starts_with("57"))
                .unwrap_or(false);
            if unavailable {
                ErrorKind::ServiceUnavailable
            } else {
                ErrorKind::InternalServerError
            }
        }
        _ => ErrorKind::InternalServerError,
    }
}

/// Storage failures never describe the failing query to the client.
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match sqlx_error_kind(&err) {
            ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Storage is temporarily unavailable").with_source(err)
            }
            _ => AppError::internal("Internal server error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_problem_status() {
        let response = AppError::forbidden("Insufficient permissions").into_response();
        assert_eq!(response.status().as_u16(), 403);
    }
}
