//! Admin Users Use Case
//!
//! Account management for admins: list/search, create with any role,
//! retrieve, patch (role and staff flag included) and delete by user name.

use std::sync::Arc;

use crate::application::current_user::{ProfilePatch, ensure_unique};
use crate::domain::authorizer::{Actor, ensure, is_admin, role_write};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Input for admin-side account creation
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
    pub is_staff: Option<bool>,
}

/// Admin patch: the self-service fields plus role and staff flag
#[derive(Debug, Clone, Default)]
pub struct AdminPatch {
    pub profile: ProfilePatch,
    pub role: Option<UserRole>,
    pub is_staff: Option<bool>,
}

pub struct AdminUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> AdminUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, actor: &Actor, search: Option<&str>) -> AuthResult<Vec<User>> {
        ensure(is_admin(actor))?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(search).await
    }

    pub async fn create(&self, actor: &Actor, input: CreateUserInput) -> AuthResult<User> {
        let capability = role_write(actor)?;

        let raw_name = input
            .user_name
            .ok_or_else(|| AuthError::Validation("username: This field is required.".into()))?;
        let raw_email = input
            .email
            .ok_or_else(|| AuthError::Validation("email: This field is required.".into()))?;

        let user_name =
            UserName::new(&raw_name).map_err(|e| AuthError::Validation(format!("username: {e}")))?;
        let email = Email::new(raw_email)
            .map_err(|e| AuthError::Validation(format!("email: {}", e.message())))?;

        let mut user = User::new(user_name, email);
        ProfilePatch {
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            ..Default::default()
        }
        .apply(&mut user)?;
        if let Some(role) = input.role {
            user.set_role(role, &capability);
        }
        if let Some(is_staff) = input.is_staff {
            user.is_staff = is_staff;
        }

        ensure_unique(self.repo.as_ref(), &user).await?;
        self.repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role(),
            created_by = %actor.user_id,
            "User created by admin"
        );
        Ok(user)
    }

    pub async fn get(&self, actor: &Actor, user_name: &str) -> AuthResult<User> {
        ensure(is_admin(actor))?;
        self.find(user_name).await
    }

    pub async fn update(&self, actor: &Actor, user_name: &str, patch: AdminPatch) -> AuthResult<User> {
        let capability = role_write(actor)?;
        let mut user = self.find(user_name).await?;
        let before = user.clone();

        patch.profile.apply(&mut user)?;
        if let Some(role) = patch.role {
            user.set_role(role, &capability);
        }
        if let Some(is_staff) = patch.is_staff {
            user.is_staff = is_staff;
        }

        if user != before {
            ensure_unique(self.repo.as_ref(), &user).await?;
            user.touch();
            self.repo.update(&user).await?;
            tracing::info!(
                user_id = %user.user_id,
                role = %user.role(),
                updated_by = %actor.user_id,
                "User updated by admin"
            );
        }

        Ok(user)
    }

    pub async fn delete(&self, actor: &Actor, user_name: &str) -> AuthResult<()> {
        ensure(is_admin(actor))?;
        let user = self.find(user_name).await?;
        self.repo.delete(&user.user_id).await?;
        tracing::info!(user_id = %user.user_id, deleted_by = %actor.user_id, "User deleted");
        Ok(())
    }

    async fn find(&self, user_name: &str) -> AuthResult<User> {
        let user_name = UserName::new(user_name).map_err(|_| AuthError::UserNotFound)?;
        self.repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
