//! Shared Kernel
//!
//! Vocabulary shared by every domain crate of the review platform:
//! - The unified error type and its HTTP classification
//! - Typed entity identifiers
//! - Small query helpers for the Postgres repositories
//!
//! Only things with the same meaning in the identity and catalog domains
//! belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod query;
