//! Request Extractors
//!
//! `Json` and `Path` wrappers whose rejections go through [`CatalogError`].

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, CatalogResult};

/// JSON body; a body that does not deserialize is a 400
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(CatalogError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; an id that does not parse cannot exist
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CatalogError))]
pub struct ApiPath<T>(pub T);

/// Deserialize a raw body taken after the ownership check
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> CatalogResult<T> {
    let Json(value) = Json::<T>::from_bytes(body)?;
    Ok(value)
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        CatalogError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Unusable path parameter");
        CatalogError::not_found("Resource")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::dto::ReviewRequest;

    #[test]
    fn test_parse_json_rejects_wrong_type() {
        let err = parse_json::<ReviewRequest>(br#"{"text": "hi", "score": "ten"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let req = parse_json::<ReviewRequest>(br#"{"score": 7}"#).unwrap();
        assert_eq!(req.score, Some(7));
    }
}
