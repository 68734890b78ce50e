//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// Fails with `UserNameTaken` / `EmailTaken` on a uniqueness violation.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by user name (exact match)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by email (exact match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find the user holding exactly this (user name, email) pair
    async fn find_by_credentials(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<Option<User>>;

    /// List users ordered by user name, optionally filtered by a user name substring
    async fn list(&self, search: Option<&str>) -> AuthResult<Vec<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete user (fails with `UserNotFound` when absent)
    async fn delete(&self, user_id: &UserId) -> AuthResult<()>;
}
