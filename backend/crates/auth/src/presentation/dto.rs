//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{AdminPatch, CreateUserInput, ProfilePatch};
use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub username: String,
    pub email: String,
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessTokenResponse {
    pub token: String,
}

// ============================================================================
// Users
// ============================================================================

/// The one user representation, shared by the self-service and admin routes
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.user_name.to_string(),
            email: user.email.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            role: user.role(),
        }
    }
}

/// PATCH /users/me
///
/// There is no `role` field: a client-sent role is ignored like any unknown key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatchRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

impl From<ProfilePatchRequest> for ProfilePatch {
    fn from(req: ProfilePatchRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
        }
    }
}

/// POST /users and PATCH /users/{username}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
    pub is_staff: Option<bool>,
}

impl From<AdminUserRequest> for CreateUserInput {
    fn from(req: AdminUserRequest) -> Self {
        Self {
            user_name: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            role: req.role,
            is_staff: req.is_staff,
        }
    }
}

impl From<AdminUserRequest> for AdminPatch {
    fn from(req: AdminUserRequest) -> Self {
        Self {
            profile: ProfilePatch {
                user_name: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                bio: req.bio,
            },
            role: req.role,
            is_staff: req.is_staff,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_patch_ignores_role() {
        let req: ProfilePatchRequest =
            serde_json::from_str(r#"{"bio": "hi", "role": "admin"}"#).unwrap();
        let patch = ProfilePatch::from(req);
        assert_eq!(patch.bio.as_deref(), Some("hi"));
        assert!(patch.user_name.is_none());
    }

    #[test]
    fn test_admin_request_rejects_unknown_role() {
        let res = serde_json::from_str::<AdminUserRequest>(r#"{"role": "superuser"}"#);
        assert!(res.is_err());
    }
}
