//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use platform::mail::Mailer;

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_admin, resolve_actor};

/// `/auth/*`: sign-up and token exchange
pub fn auth_router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/signup", post(handlers::sign_up::<R, M>))
        .route("/auth/token", post(handlers::obtain_token::<R, M>))
        .route("/auth/token/refresh", post(handlers::refresh_token::<R, M>))
        .with_state(state)
}

/// `/users/*`: self-service profile and admin account management
///
/// Handlers expect an [`crate::domain::authorizer::Actor`] in the request
/// extensions, so the caller must layer [`resolve_actor`] on top.
pub fn users_router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let admin_routes = Router::new()
        .route(
            "/users",
            get(handlers::list_users::<R, M>).post(handlers::create_user::<R, M>),
        )
        .route(
            "/users/{username}",
            get(handlers::get_user::<R, M>)
                .patch(handlers::patch_user::<R, M>)
                .delete(handlers::delete_user::<R, M>),
        )
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route(
            "/users/me",
            get(handlers::get_me::<R, M>).patch(handlers::patch_me::<R, M>),
        )
        .merge(admin_routes)
        .with_state(state)
}

/// Both routers with the actor resolver applied
pub fn router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let resolver = state.actor_resolver();

    auth_router(state.clone())
        .merge(users_router(state))
        .layer(middleware::from_fn_with_state(resolver, resolve_actor::<R>))
}
