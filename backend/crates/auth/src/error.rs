//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::authorizer::Denied;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("A user with this username already exists")]
    UserNameTaken,

    #[error("A user with this email already exists")]
    EmailTaken,

    /// Confirmation code did not verify
    #[error("Invalid confirmation code")]
    InvalidConfirmationCode,

    /// Refresh token did not verify or its user is gone
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// No usable bearer credential on a request that needs one
    #[error("Authentication credentials were not provided or are invalid")]
    Unauthenticated,

    /// Role authorizer said no
    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidConfirmationCode
            | AuthError::InvalidRefreshToken => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidConfirmationCode => {
                tracing::warn!("Confirmation code rejected");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Refresh token rejected");
            }
            AuthError::Forbidden => {
                tracing::warn!("Authorization denied");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // Keep the kernel's pool/connection classification (503 vs 500)
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(msg) => {
                tracing::debug!(message = %msg, "Hiding internal error detail");
                AppError::internal("Internal server error")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<Denied> for AuthError {
    fn from(_: Denied) -> Self {
        AuthError::Forbidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::Validation("username: required".into()), 400),
            (AuthError::InvalidConfirmationCode, 400),
            (AuthError::InvalidRefreshToken, 400),
            (AuthError::Unauthenticated, 401),
            (AuthError::Forbidden, 403),
            (AuthError::UserNotFound, 404),
            (AuthError::UserNameTaken, 409),
            (AuthError::EmailTaken, 409),
            (AuthError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status().as_u16(), status);
        }
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        let err = AuthError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(AppError::from(err).status_code(), 503);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let app: AppError = AuthError::Internal("jwt key exploded".into()).into();
        assert!(!app.message().contains("exploded"));
    }

    #[test]
    fn test_denied_is_forbidden() {
        let err: AuthError = Denied.into();
        assert!(matches!(err, AuthError::Forbidden));
    }
}
