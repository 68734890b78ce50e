//! Domain Layer
//!
//! Contains entities, value objects, the role authorizer and repository traits.

pub mod authorizer;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use authorizer::{Access, Actor, Authored, Denied};
pub use entity::user::User;
pub use repository::UserRepository;
