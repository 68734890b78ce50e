//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CommentId, ReviewId, TitleId, UserId};

use crate::domain::entity::{Classifier, ClassifierKind, Comment, Review, Title};
use crate::domain::value_object::Slug;
use crate::error::CatalogResult;

/// Title list filters; every field is optional and they combine with AND
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Genre slug (exact)
    pub genre: Option<String>,
    /// Category slug (exact)
    pub category: Option<String>,
    /// Case-insensitive substring of the title name
    pub name: Option<String>,
    pub year: Option<i32>,
}

/// Genre / category repository
#[trait_variant::make(ClassifierRepository: Send)]
pub trait LocalClassifierRepository {
    /// Fails with `Conflict` when the slug is taken within the kind
    async fn create(&self, classifier: &Classifier) -> CatalogResult<()>;

    /// Ordered by name; `search` is a case-insensitive name substring
    async fn list(&self, kind: ClassifierKind, search: Option<&str>)
    -> CatalogResult<Vec<Classifier>>;

    async fn find_by_slug(&self, kind: ClassifierKind, slug: &Slug)
    -> CatalogResult<Option<Classifier>>;

    /// Fails with `NotFound` when absent
    async fn delete_by_slug(&self, kind: ClassifierKind, slug: &Slug) -> CatalogResult<()>;
}

/// Title repository
///
/// Writes replace the genre set atomically with the title row.
#[trait_variant::make(TitleRepository: Send)]
pub trait LocalTitleRepository {
    async fn create(&self, title: &Title) -> CatalogResult<()>;

    /// Title with classifiers and rating resolved
    async fn find(&self, title_id: &TitleId) -> CatalogResult<Option<Title>>;

    async fn list(&self, filter: &TitleFilter) -> CatalogResult<Vec<Title>>;

    async fn update(&self, title: &Title) -> CatalogResult<()>;

    /// Reviews and their comments go with the title
    async fn delete(&self, title_id: &TitleId) -> CatalogResult<()>;
}

/// Review repository, always scoped to a title
#[trait_variant::make(ReviewRepository: Send)]
pub trait LocalReviewRepository {
    /// Fails with `DuplicateReview` when the author already reviewed the title
    async fn create(&self, review: &Review) -> CatalogResult<()>;

    async fn exists_for(&self, author_id: &UserId, title_id: &TitleId) -> CatalogResult<bool>;

    async fn find(&self, title_id: &TitleId, review_id: &ReviewId)
    -> CatalogResult<Option<Review>>;

    /// Newest first
    async fn list(&self, title_id: &TitleId) -> CatalogResult<Vec<Review>>;

    async fn update(&self, review: &Review) -> CatalogResult<()>;

    async fn delete(&self, review_id: &ReviewId) -> CatalogResult<()>;
}

/// Comment repository, always scoped to a review
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &Comment) -> CatalogResult<()>;

    async fn find(&self, review_id: &ReviewId, comment_id: &CommentId)
    -> CatalogResult<Option<Comment>>;

    /// Newest first
    async fn list(&self, review_id: &ReviewId) -> CatalogResult<Vec<Comment>>;

    async fn update(&self, comment: &Comment) -> CatalogResult<()>;

    async fn delete(&self, comment_id: &CommentId) -> CatalogResult<()>;
}

/// Everything the catalog router needs from one storage backend
pub trait CatalogRepository:
    ClassifierRepository
    + TitleRepository
    + ReviewRepository
    + CommentRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> CatalogRepository for T where
    T: ClassifierRepository
        + TitleRepository
        + ReviewRepository
        + CommentRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
