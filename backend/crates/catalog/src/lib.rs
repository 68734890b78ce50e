//! Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, slug/score value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Invariants
//! - Genre and category slugs are unique per kind and serve as the natural key
//! - One review per (author, title): checked at write time, enforced by a
//!   unique constraint
//! - A title's rating is the mean review score, `null` without reviews
//! - Deleting a category clears it on titles; deleting a genre only drops the link

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::handlers::CatalogAppState;
pub use presentation::router::catalog_router;

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
