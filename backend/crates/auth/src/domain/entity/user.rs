//! User Entity
//!
//! Account record: handle, email, role, profile fields and admin flags.

use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::UserId;

use crate::domain::authorizer::RoleWrite;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};

/// Maximum length for first/last name
pub const PERSON_NAME_MAX_LENGTH: usize = 150;

/// User entity
///
/// `role` and `is_superuser` have no public setters: the role changes only
/// through [`User::set_role`], which demands a [`RoleWrite`] capability.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub is_staff: bool,
    role: UserRole,
    is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the `user` role
    pub fn new(user_name: UserName, email: Email) -> Self {
        // Postgres keeps microseconds; truncate so the state hash survives a round trip
        let now = Utc::now().trunc_subsecs(6);

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            is_staff: false,
            role: UserRole::User,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a persisted user
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        user_id: UserId,
        user_name: UserName,
        email: Email,
        first_name: String,
        last_name: String,
        bio: String,
        role: UserRole,
        is_superuser: bool,
        is_staff: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            user_name,
            email,
            first_name,
            last_name,
            bio,
            is_staff,
            role,
            is_superuser,
            created_at,
            updated_at,
        }
    }

    #[inline]
    pub fn role(&self) -> UserRole {
        self.role
    }

    #[inline]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Change the role (admin path only)
    pub fn set_role(&mut self, role: UserRole, _capability: &RoleWrite) {
        self.role = role;
    }

    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().trunc_subsecs(6);
    }

    /// Digest over every persisted field
    ///
    /// Any change to the record changes the digest, which is what ties a
    /// confirmation code to the state it was issued for.
    pub fn state_hash(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(256);
        push_field(&mut buf, self.user_id.as_uuid().as_bytes());
        push_field(&mut buf, self.user_name.as_str().as_bytes());
        push_field(&mut buf, self.email.as_str().as_bytes());
        push_field(&mut buf, self.first_name.as_bytes());
        push_field(&mut buf, self.last_name.as_bytes());
        push_field(&mut buf, self.bio.as_bytes());
        push_field(&mut buf, self.role.code().as_bytes());
        push_field(&mut buf, &[self.is_superuser as u8, self.is_staff as u8]);
        push_field(&mut buf, &self.created_at.timestamp_micros().to_be_bytes());
        push_field(&mut buf, &self.updated_at.timestamp_micros().to_be_bytes());

        platform::crypto::sha256(&buf)
    }
}

/// Length-prefixed append, so adjacent fields cannot run into each other
fn push_field(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    buf.extend_from_slice(bytes);
}
