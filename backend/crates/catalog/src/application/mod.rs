//! Application Layer
//!
//! Use cases. Every mutating operation asks the role authorizer first.

pub mod classifiers;
pub mod comments;
pub mod reviews;
pub mod titles;

// Re-exports
pub use classifiers::{ClassifierInput, ClassifiersUseCase};
pub use comments::{CommentInput, CommentsUseCase};
pub use reviews::{ReviewInput, ReviewsUseCase};
pub use titles::{TitleInput, TitlesUseCase};
