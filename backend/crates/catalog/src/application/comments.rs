//! Comments Use Case
//!
//! Comments hang off a review, which itself must belong to the title in the path.

use std::sync::Arc;

use auth::authorizer::{Actor, ensure, is_owner_or_privileged};
use kernel::id::{CommentId, ReviewId, TitleId};

use crate::domain::entity::{Comment, Review};
use crate::domain::repository::{CommentRepository, ReviewRepository};
use crate::domain::value_object::{required, required_text};
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default)]
pub struct CommentInput {
    pub text: Option<String>,
}

pub struct CommentsUseCase<M, V>
where
    M: CommentRepository,
    V: ReviewRepository,
{
    comment_repo: Arc<M>,
    review_repo: Arc<V>,
}

impl<M, V> CommentsUseCase<M, V>
where
    M: CommentRepository,
    V: ReviewRepository,
{
    pub fn new(comment_repo: Arc<M>, review_repo: Arc<V>) -> Self {
        Self {
            comment_repo,
            review_repo,
        }
    }

    pub async fn list(&self, title_id: &TitleId, review_id: &ReviewId) -> CatalogResult<Vec<Comment>> {
        let review = self.review(title_id, review_id).await?;
        self.comment_repo.list(&review.id).await
    }

    pub async fn get(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> CatalogResult<Comment> {
        let review = self.review(title_id, review_id).await?;
        self.comment_repo
            .find(&review.id, comment_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Comment"))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        input: CommentInput,
    ) -> CatalogResult<Comment> {
        let review = self.review(title_id, review_id).await?;

        let text = required("text", input.text)?;
        let comment = Comment::new(review.id, actor.user_id, actor.user_name.as_str(), &text)?;
        self.comment_repo.create(&comment).await?;

        tracing::info!(comment_id = %comment.id, review_id = %review.id, author_id = %actor.user_id, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
        patch: CommentInput,
    ) -> CatalogResult<Comment> {
        let comment = self.editable(actor, title_id, review_id, comment_id).await?;
        self.apply(actor, comment, patch).await
    }

    /// Fetch a comment the caller is allowed to change
    pub async fn editable(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> CatalogResult<Comment> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        ensure(is_owner_or_privileged(actor, &comment))?;
        Ok(comment)
    }

    /// Patch a comment obtained from [`CommentsUseCase::editable`]
    pub async fn apply(
        &self,
        actor: &Actor,
        mut comment: Comment,
        patch: CommentInput,
    ) -> CatalogResult<Comment> {
        if let Some(text) = patch.text {
            comment.text = required_text("text", &text, None)?;
            self.comment_repo.update(&comment).await?;
            tracing::info!(comment_id = %comment.id, updated_by = %actor.user_id, "Comment updated");
        }
        Ok(comment)
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> CatalogResult<()> {
        let comment = self.editable(actor, title_id, review_id, comment_id).await?;
        self.comment_repo.delete(&comment.id).await?;
        tracing::info!(comment_id = %comment.id, deleted_by = %actor.user_id, "Comment deleted");
        Ok(())
    }

    async fn review(&self, title_id: &TitleId, review_id: &ReviewId) -> CatalogResult<Review> {
        self.review_repo
            .find(title_id, review_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Review"))
    }
}
