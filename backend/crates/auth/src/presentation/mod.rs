//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{ActorResolverState, MaybeActor, require_admin, resolve_actor};
pub use router::{auth_router, router, users_router};
