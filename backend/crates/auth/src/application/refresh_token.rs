//! Refresh Token Use Case

use std::sync::Arc;

use crate::application::token::{TokenService, TokenType};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Returns a fresh access token
    pub async fn execute(&self, refresh: Option<String>) -> AuthResult<String> {
        let refresh = refresh
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| AuthError::Validation("refresh: This field is required.".into()))?;

        let user_id = self
            .tokens
            .verify(refresh.trim(), TokenType::Refresh)
            .and_then(|claims| claims.user_id())
            .ok_or(AuthError::InvalidRefreshToken)?;

        // Deleted accounts cannot refresh
        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.tokens.issue(&user.user_id, TokenType::Access)
    }
}
