//! Current User Use Case
//!
//! Self-service profile: read and partially update the caller's own record.
//! The role is not part of [`ProfilePatch`]; a `role` sent by the client is
//! dropped at the DTO boundary.

use std::sync::Arc;

use crate::domain::authorizer::Actor;
use crate::domain::entity::user::{PERSON_NAME_MAX_LENGTH, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Partial profile update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    /// Validate and apply onto `user`; returns whether anything changed
    pub(crate) fn apply(self, user: &mut User) -> AuthResult<bool> {
        let before = user.clone();

        if let Some(name) = self.user_name {
            user.user_name = UserName::new(name)
                .map_err(|e| AuthError::Validation(format!("username: {e}")))?;
        }
        if let Some(email) = self.email {
            user.email = Email::new(email)
                .map_err(|e| AuthError::Validation(format!("email: {}", e.message())))?;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = person_name("first_name", first_name)?;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = person_name("last_name", last_name)?;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }

        Ok(*user != before)
    }
}

fn person_name(field: &str, value: String) -> AuthResult<String> {
    let value = value.trim().to_string();
    if value.chars().count() > PERSON_NAME_MAX_LENGTH {
        return Err(AuthError::Validation(format!(
            "{field}: Ensure this field has no more than {PERSON_NAME_MAX_LENGTH} characters."
        )));
    }
    Ok(value)
}

/// Fail with a conflict if another account already holds the user name or email
pub(crate) async fn ensure_unique<R: UserRepository>(repo: &R, user: &User) -> AuthResult<()> {
    if let Some(other) = repo.find_by_user_name(&user.user_name).await? {
        if other.user_id != user.user_id {
            return Err(AuthError::UserNameTaken);
        }
    }
    if let Some(other) = repo.find_by_email(&user.email).await? {
        if other.user_id != user.user_id {
            return Err(AuthError::EmailTaken);
        }
    }
    Ok(())
}

pub struct CurrentUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, actor: &Actor) -> AuthResult<User> {
        self.repo
            .find_by_id(&actor.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(&self, actor: &Actor, patch: ProfilePatch) -> AuthResult<User> {
        let mut user = self.get(actor).await?;

        if patch.apply(&mut user)? {
            ensure_unique(self.repo.as_ref(), &user).await?;
            user.touch();
            self.repo.update(&user).await?;
            tracing::info!(user_id = %user.user_id, "Profile updated");
        }

        Ok(user)
    }
}
