//! Request Extractors
//!
//! `Json` and `Path` wrappers whose rejections go through [`AuthError`],
//! so malformed input gets the same problem response as any other error.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AuthError;

/// JSON body; a body that does not deserialize is a 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; an unusable segment cannot name a user
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AuthError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AuthError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Unusable path parameter");
        AuthError::UserNotFound
    }
}
