//! Actor Middleware
//!
//! Resolves `Authorization: Bearer <access token>` into an [`Actor`] stored
//! in the request extensions. The role is read from the user record on every
//! request, so a role change takes effect without re-issuing tokens.
//!
//! - no header: the request continues anonymously
//! - malformed header, bad token, or deleted user: 401

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::convert::Infallible;
use std::sync::Arc;

use platform::bearer::extract_bearer_token;

use crate::application::token::{TokenService, TokenType};
use crate::domain::authorizer::{Actor, is_admin};
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct ActorResolverState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

/// Attach the calling [`Actor`] when a valid bearer token is present
pub async fn resolve_actor<R>(
    State(state): State<ActorResolverState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = match extract_bearer_token(req.headers()) {
        Ok(Some(token)) => token.to_owned(),
        Ok(None) => return next.run(req).await,
        Err(e) => {
            tracing::debug!(error = %e, "Malformed Authorization header");
            return AuthError::Unauthenticated.into_response();
        }
    };

    let Some(user_id) = state
        .tokens
        .verify(&token, TokenType::Access)
        .and_then(|claims| claims.user_id())
    else {
        return AuthError::Unauthenticated.into_response();
    };

    match state.repo.find_by_id(&user_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(Actor::from_user(&user));
            next.run(req).await
        }
        Ok(None) => {
            tracing::debug!(user_id = %user_id, "Token for a deleted user");
            AuthError::Unauthenticated.into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Account management gate; runs before any body is read
///
/// Expects [`resolve_actor`] to run first.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<Actor>() {
        Some(actor) if is_admin(actor) => next.run(req).await,
        Some(_) => AuthError::Forbidden.into_response(),
        None => AuthError::Unauthenticated.into_response(),
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// Requires an authenticated caller; rejects with 401 otherwise
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// The caller if there is one (public read routes)
#[derive(Debug, Clone)]
pub struct MaybeActor(pub Option<Actor>);

impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(parts.extensions.get::<Actor>().cloned()))
    }
}
