//! Role Authorizer
//!
//! One predicate set, evaluated against the caller's role as currently
//! stored. Every mutating use case (here and in the catalog) asks these
//! predicates before touching storage, and before validating its input.
//!
//! | predicate                  | true when                                 |
//! |----------------------------|-------------------------------------------|
//! | `is_admin`                 | role is admin, or the account is superuser |
//! | `is_moderator`             | role is moderator                         |
//! | `is_owner_or_privileged`   | caller wrote the resource, or mod/admin   |
//! | `is_admin_or_safe_method`  | admin, or the access is a read            |

use axum::http::Method;
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};

/// The authenticated caller, resolved from the bearer token on every request
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub user_id: UserId,
    pub user_name: UserName,
    pub role: UserRole,
    pub is_superuser: bool,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name.clone(),
            role: user.role(),
            is_superuser: user.is_superuser(),
        }
    }
}

/// Whether a request only reads or may mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    /// GET, HEAD and OPTIONS are reads; everything else writes
    pub fn from_method(method: &Method) -> Self {
        if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
            Access::Read
        } else {
            Access::Write
        }
    }
}

/// A resource with an author
pub trait Authored {
    fn author_id(&self) -> UserId;
}

/// The predicate evaluated to false
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("You do not have permission to perform this action")]
pub struct Denied;

pub fn is_admin(actor: &Actor) -> bool {
    actor.role == UserRole::Admin || actor.is_superuser
}

pub fn is_moderator(actor: &Actor) -> bool {
    actor.role == UserRole::Moderator
}

pub fn is_owner_or_privileged<R>(actor: &Actor, resource: &R) -> bool
where
    R: Authored + ?Sized,
{
    resource.author_id() == actor.user_id || is_moderator(actor) || is_admin(actor)
}

pub fn is_admin_or_safe_method(actor: Option<&Actor>, access: Access) -> bool {
    access == Access::Read || actor.is_some_and(is_admin)
}

/// Turn a predicate result into a `Result`
///
/// ```
/// use auth::authorizer::{ensure, is_admin, Denied};
/// # fn check(actor: &auth::authorizer::Actor) -> Result<(), Denied> {
/// ensure(is_admin(actor))?;
/// # Ok(())
/// # }
/// ```
#[inline]
pub fn ensure(allowed: bool) -> Result<(), Denied> {
    if allowed { Ok(()) } else { Err(Denied) }
}

/// Capability to change a user's role
///
/// Only [`role_write`] mints one, and only for admins. Self-service profile
/// updates never hold it, so `role` stays read-only there.
#[derive(Debug)]
pub struct RoleWrite {
    _private: (),
}

pub fn role_write(actor: &Actor) -> Result<RoleWrite, Denied> {
    ensure(is_admin(actor))?;
    Ok(RoleWrite { _private: () })
}

#[cfg(test)]
impl RoleWrite {
    pub(crate) fn granted_for_tests() -> Self {
        RoleWrite { _private: () }
    }
}
