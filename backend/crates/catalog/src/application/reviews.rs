//! Reviews Use Case
//!
//! One review per author per title. The write-time check gives a message
//! naming the title; the storage constraint closes the race behind it.

use std::sync::Arc;

use auth::authorizer::{Actor, ensure, is_owner_or_privileged};
use kernel::id::{ReviewId, TitleId};

use crate::domain::entity::{Review, Title};
use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::value_object::{Score, required, required_text};
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub text: Option<String>,
    pub score: Option<i64>,
}

pub struct ReviewsUseCase<V, T>
where
    V: ReviewRepository,
    T: TitleRepository,
{
    review_repo: Arc<V>,
    title_repo: Arc<T>,
}

impl<V, T> ReviewsUseCase<V, T>
where
    V: ReviewRepository,
    T: TitleRepository,
{
    pub fn new(review_repo: Arc<V>, title_repo: Arc<T>) -> Self {
        Self {
            review_repo,
            title_repo,
        }
    }

    pub async fn list(&self, title_id: &TitleId) -> CatalogResult<Vec<Review>> {
        self.title(title_id).await?;
        self.review_repo.list(title_id).await
    }

    pub async fn get(&self, title_id: &TitleId, review_id: &ReviewId) -> CatalogResult<Review> {
        self.review_repo
            .find(title_id, review_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Review"))
    }

    /// Any authenticated caller may review a title once
    pub async fn create(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        input: ReviewInput,
    ) -> CatalogResult<Review> {
        let title = self.title(title_id).await?;

        let text = required("text", input.text)?;
        let score = Score::new(required("score", input.score)?)?;
        let review = Review::new(title.id, actor.user_id, actor.user_name.as_str(), &text, score)?;

        if self.review_repo.exists_for(&actor.user_id, &title.id).await? {
            return Err(review_exists(&title));
        }
        match self.review_repo.create(&review).await {
            Err(CatalogError::DuplicateReview) => return Err(review_exists(&title)),
            other => other?,
        }

        tracing::info!(review_id = %review.id, title_id = %title.id, author_id = %actor.user_id, "Review created");
        Ok(review)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
        patch: ReviewInput,
    ) -> CatalogResult<Review> {
        let review = self.editable(actor, title_id, review_id).await?;
        self.apply(actor, review, patch).await
    }

    /// Fetch a review the caller is allowed to change
    pub async fn editable(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> CatalogResult<Review> {
        let review = self.get(title_id, review_id).await?;
        ensure(is_owner_or_privileged(actor, &review))?;
        Ok(review)
    }

    /// Patch a review obtained from [`ReviewsUseCase::editable`]
    pub async fn apply(
        &self,
        actor: &Actor,
        mut review: Review,
        patch: ReviewInput,
    ) -> CatalogResult<Review> {
        if let Some(text) = patch.text {
            review.text = required_text("text", &text, None)?;
        }
        if let Some(score) = patch.score {
            review.score = Score::new(score)?;
        }
        self.review_repo.update(&review).await?;

        tracing::info!(review_id = %review.id, updated_by = %actor.user_id, "Review updated");
        Ok(review)
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> CatalogResult<()> {
        let review = self.editable(actor, title_id, review_id).await?;
        self.review_repo.delete(&review.id).await?;
        tracing::info!(review_id = %review.id, deleted_by = %actor.user_id, "Review deleted");
        Ok(())
    }

    async fn title(&self, title_id: &TitleId) -> CatalogResult<Title> {
        self.title_repo
            .find(title_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Title"))
    }
}

fn review_exists(title: &Title) -> CatalogError {
    CatalogError::Conflict(format!("A review of '{}' already exists", title.name))
}
