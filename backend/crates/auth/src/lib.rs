//! Auth Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, authorizer, repository traits
//! - `application/` - Use cases, confirmation codes, JWT service
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, actor middleware
//!
//! ## Features
//! - Password-less sign-up: a confirmation code is mailed to the address
//! - Confirmation code + user name exchanged for access/refresh JWTs
//! - Self-service profile (`/users/me`) and admin account management
//! - Role authorizer (User, Moderator, Admin, plus the superuser flag)
//!
//! ## Security Model
//! - Codes are HMAC-SHA256 over the user's state hash and a time window;
//!   nothing is stored, and any change to the user record invalidates them
//! - Roles are read from the database on every request
//! - Role changes require a [`authorizer::RoleWrite`] capability only the
//!   admin check can hand out

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::authorizer::{Access, Actor, Authored, Denied};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::MaybeActor;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod authorizer {
    pub use crate::domain::authorizer::*;
}

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
