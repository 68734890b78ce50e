//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::{
    AdminUsersUseCase, ConfirmationCodes, CurrentUserUseCase, ObtainTokenInput,
    ObtainTokenUseCase, RefreshTokenUseCase, SignUpInput, SignUpUseCase, TokenService,
};
use crate::domain::authorizer::Actor;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AccessTokenResponse, AdminUserRequest, ProfilePatchRequest, RefreshRequest, SignUpRequest,
    SignUpResponse, TokenRequest, TokenResponse, UserListQuery, UserResponse,
};
use crate::presentation::extract::{ApiJson, ApiPath};
use crate::presentation::middleware::ActorResolverState;

/// Shared state for auth and user handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub codes: Arc<ConfirmationCodes>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, mailer: M, config: AuthConfig) -> Self {
        Self::with_codes(repo, mailer, ConfirmationCodes::from_config(&config), config)
    }

    /// Same as [`AuthAppState::new`] with a caller-built code issuer (custom clock)
    pub fn with_codes(repo: R, mailer: M, codes: ConfirmationCodes, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            mailer: Arc::new(mailer),
            codes: Arc::new(codes),
            tokens: Arc::new(TokenService::new(&config)),
            config: Arc::new(config),
        }
    }

    /// State for [`crate::presentation::middleware::resolve_actor`]
    pub fn actor_resolver(&self) -> ActorResolverState<R> {
        ActorResolverState {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ============================================================================
// Sign Up / Tokens
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.codes.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            user_name: req.username,
            email: req.email,
        })
        .await?;

    Ok(Json(SignUpResponse {
        username: output.user_name.into_inner(),
        email: output.email.into_db(),
    }))
}

/// POST /auth/token
pub async fn obtain_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        ObtainTokenUseCase::new(state.repo.clone(), state.codes.clone(), state.tokens.clone());

    let pair = use_case
        .execute(ObtainTokenInput {
            user_name: req.username,
            confirmation_code: req.confirmation_code,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: pair.access,
        refresh: pair.refresh,
    }))
}

/// POST /auth/token/refresh
pub async fn refresh_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> AuthResult<Json<AccessTokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.tokens.clone());
    let token = use_case.execute(req.refresh).await?;
    Ok(Json(AccessTokenResponse { token }))
}

// ============================================================================
// Self-service profile
// ============================================================================

/// GET /users/me
pub async fn get_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone()).get(&actor).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/me
pub async fn patch_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    ApiJson(req): ApiJson<ProfilePatchRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.repo.clone())
        .update(&actor, req.into())
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Admin user management
// ============================================================================

/// GET /users?search=
pub async fn list_users<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    Query(query): Query<UserListQuery>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let users = AdminUsersUseCase::new(state.repo.clone())
        .list(&actor, query.search.as_deref())
        .await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /users
pub async fn create_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    ApiJson(req): ApiJson<AdminUserRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = AdminUsersUseCase::new(state.repo.clone())
        .create(&actor, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /users/{username}
pub async fn get_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    ApiPath(username): ApiPath<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = AdminUsersUseCase::new(state.repo.clone())
        .get(&actor, &username)
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /users/{username}
pub async fn patch_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    ApiPath(username): ApiPath<String>,
    ApiJson(req): ApiJson<AdminUserRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let user = AdminUsersUseCase::new(state.repo.clone())
        .update(&actor, &username, req.into())
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{username}
pub async fn delete_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    actor: Actor,
    ApiPath(username): ApiPath<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    AdminUsersUseCase::new(state.repo.clone())
        .delete(&actor, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
