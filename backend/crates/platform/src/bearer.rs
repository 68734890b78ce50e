//! Bearer credential extraction
//!
//! Reads `Authorization: Bearer <token>` from request headers.

use axum::http::{HeaderMap, header};

/// Error when the Authorization header is present but unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Authorization header is not valid ASCII")]
    NotAscii,
    #[error("Authorization scheme must be Bearer")]
    WrongScheme,
    #[error("Bearer token is empty")]
    Empty,
}

/// Extract the bearer token from request headers
///
/// ## Returns
/// * `Ok(None)` - no Authorization header (anonymous caller)
/// * `Ok(Some(token))` - token string, surrounding whitespace trimmed
/// * `Err(BearerError)` - header present but malformed
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, BearerError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| BearerError::NotAscii)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(BearerError::WrongScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::WrongScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::Empty);
    }
    Ok(Some(token))
}
