//! Titles Use Case
//!
//! Public list/retrieve with filters; admin-only create, patch and delete.
//! Genre and category references arrive as slugs and must resolve.

use std::sync::Arc;

use auth::authorizer::{Actor, ensure, is_admin};
use kernel::id::TitleId;

use crate::domain::entity::{Classifier, ClassifierKind, Title, current_year};
use crate::domain::repository::{ClassifierRepository, TitleFilter, TitleRepository};
use crate::domain::value_object::{Slug, required};
use crate::error::{CatalogError, CatalogResult};

/// Create body, or patch body where `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Genre slugs; replaces the whole set
    pub genre: Option<Vec<String>>,
}

pub struct TitlesUseCase<T, C>
where
    T: TitleRepository,
    C: ClassifierRepository,
{
    title_repo: Arc<T>,
    classifier_repo: Arc<C>,
}

impl<T, C> TitlesUseCase<T, C>
where
    T: TitleRepository,
    C: ClassifierRepository,
{
    pub fn new(title_repo: Arc<T>, classifier_repo: Arc<C>) -> Self {
        Self {
            title_repo,
            classifier_repo,
        }
    }

    pub async fn list(&self, filter: TitleFilter) -> CatalogResult<Vec<Title>> {
        let filter = TitleFilter {
            genre: non_blank(filter.genre),
            category: non_blank(filter.category),
            name: non_blank(filter.name),
            year: filter.year,
        };
        self.title_repo.list(&filter).await
    }

    pub async fn get(&self, title_id: &TitleId) -> CatalogResult<Title> {
        self.title_repo
            .find(title_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Title"))
    }

    pub async fn create(&self, actor: &Actor, input: TitleInput) -> CatalogResult<Title> {
        ensure(is_admin(actor))?;

        let name = required("name", input.name)?;
        let year = required("year", input.year)?;
        let mut title = Title::new(&name, year)?;
        title.set_description(input.description);
        if let Some(slug) = input.category {
            title.category = Some(self.resolve(ClassifierKind::Category, &slug).await?);
        }
        if let Some(slugs) = input.genre {
            title.genres = self.resolve_genres(&slugs).await?;
        }

        self.title_repo.create(&title).await?;

        tracing::info!(title_id = %title.id, created_by = %actor.user_id, "Title created");
        Ok(title)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        title_id: &TitleId,
        patch: TitleInput,
    ) -> CatalogResult<Title> {
        ensure(is_admin(actor))?;
        let mut title = self.get(title_id).await?;

        if let Some(name) = patch.name {
            title.name = Title::validate_name(&name)?;
        }
        if let Some(year) = patch.year {
            title.year = Title::validate_year(year, current_year())?;
        }
        if patch.description.is_some() {
            title.set_description(patch.description);
        }
        if let Some(slug) = patch.category {
            title.category = Some(self.resolve(ClassifierKind::Category, &slug).await?);
        }
        if let Some(slugs) = patch.genre {
            title.genres = self.resolve_genres(&slugs).await?;
        }

        self.title_repo.update(&title).await?;

        tracing::info!(title_id = %title.id, updated_by = %actor.user_id, "Title updated");
        Ok(title)
    }

    pub async fn delete(&self, actor: &Actor, title_id: &TitleId) -> CatalogResult<()> {
        ensure(is_admin(actor))?;
        self.title_repo.delete(title_id).await?;
        tracing::info!(title_id = %title_id, deleted_by = %actor.user_id, "Title deleted");
        Ok(())
    }

    async fn resolve(&self, kind: ClassifierKind, slug: &str) -> CatalogResult<Classifier> {
        let unknown = || CatalogError::NotFound(format!("{} '{}' not found", kind.label(), slug.trim()));
        let slug = Slug::new(slug).map_err(|_| unknown())?;
        self.classifier_repo
            .find_by_slug(kind, &slug)
            .await?
            .ok_or_else(unknown)
    }

    async fn resolve_genres(&self, slugs: &[String]) -> CatalogResult<Vec<Classifier>> {
        let mut genres: Vec<Classifier> = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let genre = self.resolve(ClassifierKind::Genre, slug).await?;
            if !genres.iter().any(|g| g.id == genre.id) {
                genres.push(genre);
            }
        }
        Ok(genres)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
