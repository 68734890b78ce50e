//! Obtain Token Use Case
//!
//! Exchanges (user name, confirmation code) for an access/refresh token pair.

use std::sync::Arc;

use crate::application::confirmation::ConfirmationCodes;
use crate::application::token::{TokenPair, TokenService};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{confirmation_code::ConfirmationCode, user_name::UserName};
use crate::error::{AuthError, AuthResult};

pub struct ObtainTokenInput {
    pub user_name: Option<String>,
    pub confirmation_code: Option<String>,
}

pub struct ObtainTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    codes: Arc<ConfirmationCodes>,
    tokens: Arc<TokenService>,
}

impl<R> ObtainTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, codes: Arc<ConfirmationCodes>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            codes,
            tokens,
        }
    }

    pub async fn execute(&self, input: ObtainTokenInput) -> AuthResult<TokenPair> {
        let raw_name = input
            .user_name
            .ok_or_else(|| AuthError::Validation("username: This field is required.".into()))?;
        let code = input
            .confirmation_code
            .map(ConfirmationCode::new)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                AuthError::Validation("confirmation_code: This field is required.".into())
            })?;

        // A name that cannot be valid cannot exist either
        let user_name = UserName::new(&raw_name).map_err(|_| AuthError::UserNotFound)?;
        let user = self
            .repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.codes.verify(&user, &code) {
            tracing::warn!(user_id = %user.user_id, "Confirmation code mismatch");
            return Err(AuthError::InvalidConfirmationCode);
        }

        let pair = self.tokens.issue_pair(&user.user_id)?;
        tracing::info!(user_id = %user.user_id, "Tokens issued");
        Ok(pair)
    }
}
