//! Catalog Middleware

use auth::authorizer::{Access, Actor, is_admin_or_safe_method};
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::CatalogError;

/// Reads for everyone, writes for admins
///
/// Expects the auth crate's actor resolver to run first.
pub async fn admin_or_read_only(req: Request<Body>, next: Next) -> Response {
    let access = Access::from_method(req.method());
    let actor = req.extensions().get::<Actor>();

    if is_admin_or_safe_method(actor, access) {
        return next.run(req).await;
    }

    match actor {
        None => CatalogError::Unauthenticated.into_response(),
        Some(_) => CatalogError::Forbidden.into_response(),
    }
}
