//! Classifiers Use Case
//!
//! Genres and categories: public list, admin-only create and delete-by-slug.

use std::sync::Arc;

use auth::authorizer::{Actor, ensure, is_admin};

use crate::domain::entity::{Classifier, ClassifierKind};
use crate::domain::repository::ClassifierRepository;
use crate::domain::value_object::{Slug, required};
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default)]
pub struct ClassifierInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

pub struct ClassifiersUseCase<C>
where
    C: ClassifierRepository,
{
    repo: Arc<C>,
    kind: ClassifierKind,
}

impl<C> ClassifiersUseCase<C>
where
    C: ClassifierRepository,
{
    pub fn new(repo: Arc<C>, kind: ClassifierKind) -> Self {
        Self { repo, kind }
    }

    pub async fn list(&self, search: Option<&str>) -> CatalogResult<Vec<Classifier>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(self.kind, search).await
    }

    pub async fn create(&self, actor: &Actor, input: ClassifierInput) -> CatalogResult<Classifier> {
        ensure(is_admin(actor))?;

        let name = required("name", input.name)?;
        let slug = required("slug", input.slug)?;
        let classifier = Classifier::new(self.kind, &name, &slug)?;

        if self.repo.find_by_slug(self.kind, &classifier.slug).await?.is_some() {
            return Err(slug_taken(self.kind, &classifier.slug));
        }
        self.repo.create(&classifier).await?;

        tracing::info!(kind = self.kind.label(), slug = %classifier.slug, "Classifier created");
        Ok(classifier)
    }

    pub async fn delete(&self, actor: &Actor, slug: &str) -> CatalogResult<()> {
        ensure(is_admin(actor))?;

        // A malformed slug cannot exist
        let slug = Slug::new(slug).map_err(|_| CatalogError::not_found(self.kind.label()))?;
        self.repo.delete_by_slug(self.kind, &slug).await?;

        tracing::info!(kind = self.kind.label(), slug = %slug, "Classifier deleted");
        Ok(())
    }
}

pub(crate) fn slug_taken(kind: ClassifierKind, slug: &Slug) -> CatalogError {
    CatalogError::Conflict(format!(
        "{} with slug '{slug}' already exists",
        kind.label()
    ))
}
