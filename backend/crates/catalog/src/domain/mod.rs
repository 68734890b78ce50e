//! Domain Layer
//!
//! This layer contains:
//! - Entities (Classifier, Title, Review, Comment)
//! - Value objects (Slug, Score)
//! - Rating aggregation
//! - Repository traits (interfaces)

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{Classifier, ClassifierKind, Comment, Review, Title};
pub use repository::{
    CatalogRepository, ClassifierRepository, CommentRepository, ReviewRepository, TitleFilter,
    TitleRepository,
};
pub use value_object::{Score, Slug};
