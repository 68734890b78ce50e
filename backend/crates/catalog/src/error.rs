//! Catalog Error Types
//!
//! This module provides catalog-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::authorizer::Denied;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific error variants
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Unknown id or slug
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation with a readable message
    #[error("{0}")]
    Conflict(String),

    /// The `(author, title)` unique constraint fired
    ///
    /// Use cases replace this with a [`CatalogError::Conflict`] naming the title.
    #[error("Review already exists")]
    DuplicateReview,

    /// Write attempted without a caller
    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    /// Role authorizer said no
    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        CatalogError::NotFound(format!("{what} not found"))
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Conflict(_) | CatalogError::DuplicateReview => ErrorKind::Conflict,
            CatalogError::Unauthenticated => ErrorKind::Unauthorized,
            CatalogError::Forbidden => ErrorKind::Forbidden,
            CatalogError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Forbidden => {
                tracing::warn!("Catalog write denied");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<Denied> for CatalogError {
    fn from(_: Denied) -> Self {
        CatalogError::Forbidden
    }
}
