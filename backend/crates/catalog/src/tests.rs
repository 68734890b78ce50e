//! Use case and router tests for the catalog crate
//!
//! The in-memory repository mirrors the migration's cascade rules.

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use auth::authorizer::Actor;
    use auth::domain::value_object::{user_name::UserName, user_role::UserRole};
    use kernel::id::{CommentId, ReviewId, TitleId, UserId};

    use crate::domain::entity::{Classifier, ClassifierKind, Comment, Review, Title};
    use crate::domain::repository::{
        ClassifierRepository, CommentRepository, ReviewRepository, TitleFilter, TitleRepository,
    };
    use crate::domain::value_object::{Score, Slug};
    use crate::error::{CatalogError, CatalogResult};

    /// Mean score, `None` without reviews; `AVG(score)` in Postgres
    fn average(scores: &[Score]) -> Option<f64> {
        if scores.is_empty() {
            return None;
        }
        let sum: u32 = scores.iter().map(|s| u32::from(s.get())).sum();
        Some(f64::from(sum) / scores.len() as f64)
    }

    #[derive(Default)]
    struct Store {
        classifiers: Vec<Classifier>,
        titles: Vec<Title>,
        reviews: Vec<Review>,
        comments: Vec<Comment>,
    }

    #[derive(Clone, Default)]
    pub struct InMemoryCatalogRepository {
        store: Arc<Mutex<Store>>,
    }

    impl InMemoryCatalogRepository {
        pub fn comment_count(&self) -> usize {
            self.store.lock().unwrap().comments.len()
        }

        fn with_rating(store: &Store, title: &Title) -> Title {
            let scores: Vec<_> = store
                .reviews
                .iter()
                .filter(|r| r.title_id == title.id)
                .map(|r| r.score)
                .collect();
            Title {
                rating: average(&scores),
                ..title.clone()
            }
        }
    }

    impl ClassifierRepository for InMemoryCatalogRepository {
        async fn create(&self, classifier: &Classifier) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            if store
                .classifiers
                .iter()
                .any(|c| c.kind == classifier.kind && c.slug == classifier.slug)
            {
                return Err(CatalogError::Conflict("slug taken".into()));
            }
            store.classifiers.push(classifier.clone());
            Ok(())
        }

        async fn list(
            &self,
            kind: ClassifierKind,
            search: Option<&str>,
        ) -> CatalogResult<Vec<Classifier>> {
            let store = self.store.lock().unwrap();
            let needle = search.map(str::to_lowercase);
            let mut found: Vec<Classifier> = store
                .classifiers
                .iter()
                .filter(|c| c.kind == kind)
                .filter(|c| {
                    needle
                        .as_deref()
                        .is_none_or(|n| c.name.to_lowercase().contains(n))
                })
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        }

        async fn find_by_slug(
            &self,
            kind: ClassifierKind,
            slug: &Slug,
        ) -> CatalogResult<Option<Classifier>> {
            let store = self.store.lock().unwrap();
            Ok(store
                .classifiers
                .iter()
                .find(|c| c.kind == kind && c.slug == *slug)
                .cloned())
        }

        async fn delete_by_slug(&self, kind: ClassifierKind, slug: &Slug) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let Some(pos) = store
                .classifiers
                .iter()
                .position(|c| c.kind == kind && c.slug == *slug)
            else {
                return Err(CatalogError::not_found(kind.label()));
            };
            let removed = store.classifiers.remove(pos);

            for title in &mut store.titles {
                match kind {
                    ClassifierKind::Category => {
                        if title.category.as_ref().is_some_and(|c| c.id == removed.id) {
                            title.category = None;
                        }
                    }
                    ClassifierKind::Genre => title.genres.retain(|g| g.id != removed.id),
                }
            }
            Ok(())
        }
    }

    impl TitleRepository for InMemoryCatalogRepository {
        async fn create(&self, title: &Title) -> CatalogResult<()> {
            self.store.lock().unwrap().titles.push(title.clone());
            Ok(())
        }

        async fn find(&self, title_id: &TitleId) -> CatalogResult<Option<Title>> {
            let store = self.store.lock().unwrap();
            Ok(store
                .titles
                .iter()
                .find(|t| t.id == *title_id)
                .map(|t| Self::with_rating(&store, t)))
        }

        async fn list(&self, filter: &TitleFilter) -> CatalogResult<Vec<Title>> {
            let store = self.store.lock().unwrap();
            let name = filter.name.as_deref().map(str::to_lowercase);
            let mut found: Vec<Title> = store
                .titles
                .iter()
                .filter(|t| {
                    filter
                        .genre
                        .as_deref()
                        .is_none_or(|g| t.genres.iter().any(|x| x.slug.as_str() == g))
                })
                .filter(|t| {
                    filter.category.as_deref().is_none_or(|c| {
                        t.category.as_ref().is_some_and(|x| x.slug.as_str() == c)
                    })
                })
                .filter(|t| {
                    name.as_deref()
                        .is_none_or(|n| t.name.to_lowercase().contains(n))
                })
                .filter(|t| filter.year.is_none_or(|y| t.year == y))
                .map(|t| Self::with_rating(&store, t))
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        }

        async fn update(&self, title: &Title) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let slot = store
                .titles
                .iter_mut()
                .find(|t| t.id == title.id)
                .ok_or_else(|| CatalogError::not_found("Title"))?;
            *slot = title.clone();
            Ok(())
        }

        async fn delete(&self, title_id: &TitleId) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let before = store.titles.len();
            store.titles.retain(|t| t.id != *title_id);
            if store.titles.len() == before {
                return Err(CatalogError::not_found("Title"));
            }
            let gone: Vec<ReviewId> = store
                .reviews
                .iter()
                .filter(|r| r.title_id == *title_id)
                .map(|r| r.id)
                .collect();
            store.reviews.retain(|r| r.title_id != *title_id);
            store.comments.retain(|c| !gone.contains(&c.review_id));
            Ok(())
        }
    }

    impl ReviewRepository for InMemoryCatalogRepository {
        async fn create(&self, review: &Review) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            if store
                .reviews
                .iter()
                .any(|r| r.author_id == review.author_id && r.title_id == review.title_id)
            {
                return Err(CatalogError::DuplicateReview);
            }
            store.reviews.push(review.clone());
            Ok(())
        }

        async fn exists_for(&self, author_id: &UserId, title_id: &TitleId) -> CatalogResult<bool> {
            let store = self.store.lock().unwrap();
            Ok(store
                .reviews
                .iter()
                .any(|r| r.author_id == *author_id && r.title_id == *title_id))
        }

        async fn find(
            &self,
            title_id: &TitleId,
            review_id: &ReviewId,
        ) -> CatalogResult<Option<Review>> {
            let store = self.store.lock().unwrap();
            Ok(store
                .reviews
                .iter()
                .find(|r| r.id == *review_id && r.title_id == *title_id)
                .cloned())
        }

        async fn list(&self, title_id: &TitleId) -> CatalogResult<Vec<Review>> {
            let store = self.store.lock().unwrap();
            let mut found: Vec<Review> = store
                .reviews
                .iter()
                .filter(|r| r.title_id == *title_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
            Ok(found)
        }

        async fn update(&self, review: &Review) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let slot = store
                .reviews
                .iter_mut()
                .find(|r| r.id == review.id)
                .ok_or_else(|| CatalogError::not_found("Review"))?;
            *slot = review.clone();
            Ok(())
        }

        async fn delete(&self, review_id: &ReviewId) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let before = store.reviews.len();
            store.reviews.retain(|r| r.id != *review_id);
            if store.reviews.len() == before {
                return Err(CatalogError::not_found("Review"));
            }
            store.comments.retain(|c| c.review_id != *review_id);
            Ok(())
        }
    }

    impl CommentRepository for InMemoryCatalogRepository {
        async fn create(&self, comment: &Comment) -> CatalogResult<()> {
            self.store.lock().unwrap().comments.push(comment.clone());
            Ok(())
        }

        async fn find(
            &self,
            review_id: &ReviewId,
            comment_id: &CommentId,
        ) -> CatalogResult<Option<Comment>> {
            let store = self.store.lock().unwrap();
            Ok(store
                .comments
                .iter()
                .find(|c| c.id == *comment_id && c.review_id == *review_id)
                .cloned())
        }

        async fn list(&self, review_id: &ReviewId) -> CatalogResult<Vec<Comment>> {
            let store = self.store.lock().unwrap();
            Ok(store
                .comments
                .iter()
                .filter(|c| c.review_id == *review_id)
                .cloned()
                .collect())
        }

        async fn update(&self, comment: &Comment) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let slot = store
                .comments
                .iter_mut()
                .find(|c| c.id == comment.id)
                .ok_or_else(|| CatalogError::not_found("Comment"))?;
            *slot = comment.clone();
            Ok(())
        }

        async fn delete(&self, comment_id: &CommentId) -> CatalogResult<()> {
            let mut store = self.store.lock().unwrap();
            let before = store.comments.len();
            store.comments.retain(|c| c.id != *comment_id);
            if store.comments.len() == before {
                return Err(CatalogError::not_found("Comment"));
            }
            Ok(())
        }
    }

    pub fn actor(name: &str, role: UserRole) -> Actor {
        Actor {
            user_id: UserId::new(),
            user_name: UserName::new(name).unwrap(),
            role,
            is_superuser: false,
        }
    }

    pub fn admin() -> Actor {
        actor("root", UserRole::Admin)
    }
}

#[cfg(test)]
mod classifier_tests {
    use std::sync::Arc;

    use auth::domain::value_object::user_role::UserRole;

    use super::support::*;
    use crate::application::{ClassifierInput, ClassifiersUseCase};
    use crate::domain::entity::ClassifierKind;
    use crate::error::CatalogError;

    fn input(name: &str, slug: &str) -> ClassifierInput {
        ClassifierInput {
            name: Some(name.into()),
            slug: Some(slug.into()),
        }
    }

    #[tokio::test]
    async fn test_create_list_delete() {
        let repo = Arc::new(InMemoryCatalogRepository::default());
        let genres = ClassifiersUseCase::new(repo.clone(), ClassifierKind::Genre);

        genres.create(&admin(), input("Drama", "drama")).await.unwrap();
        genres.create(&admin(), input("Comedy", "comedy")).await.unwrap();

        let names: Vec<String> = genres
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, ["Comedy", "Drama"]);
        assert_eq!(genres.list(Some("dra")).await.unwrap().len(), 1);

        genres.delete(&admin(), "drama").await.unwrap();
        assert!(matches!(
            genres.delete(&admin(), "drama").await.unwrap_err(),
            CatalogError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_slug_unique_per_kind() {
        let repo = Arc::new(InMemoryCatalogRepository::default());
        let genres = ClassifiersUseCase::new(repo.clone(), ClassifierKind::Genre);
        let categories = ClassifiersUseCase::new(repo, ClassifierKind::Category);

        genres.create(&admin(), input("Rock", "rock")).await.unwrap();
        let err = genres
            .create(&admin(), input("Rock again", "rock"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(m) if m.contains("rock")));

        // Same slug under the other kind is fine
        categories.create(&admin(), input("Rock", "rock")).await.unwrap();
    }

    #[tokio::test]
    async fn test_writes_are_admin_only() {
        let repo = Arc::new(InMemoryCatalogRepository::default());
        let genres = ClassifiersUseCase::new(repo, ClassifierKind::Genre);

        for role in [UserRole::User, UserRole::Moderator] {
            // Denied before the (invalid) input is looked at
            let err = genres
                .create(&actor("bob", role), input("", "bad slug"))
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Forbidden));
        }
    }
}

#[cfg(test)]
mod title_tests {
    use std::sync::Arc;

    use auth::domain::value_object::user_role::UserRole;
    use kernel::id::TitleId;

    use super::support::*;
    use crate::application::{
        ClassifierInput, ClassifiersUseCase, ReviewInput, ReviewsUseCase, TitleInput,
        TitlesUseCase,
    };
    use crate::domain::entity::{ClassifierKind, current_year};
    use crate::domain::repository::TitleFilter;
    use crate::error::CatalogError;

    type Repo = InMemoryCatalogRepository;

    struct Fixture {
        repo: Arc<Repo>,
    }

    impl Fixture {
        async fn new() -> Self {
            let repo = Arc::new(Repo::default());
            for (kind, name, slug) in [
                (ClassifierKind::Genre, "Drama", "drama"),
                (ClassifierKind::Genre, "Comedy", "comedy"),
                (ClassifierKind::Category, "Films", "films"),
                (ClassifierKind::Category, "Books", "books"),
            ] {
                ClassifiersUseCase::new(repo.clone(), kind)
                    .create(
                        &admin(),
                        ClassifierInput {
                            name: Some(name.into()),
                            slug: Some(slug.into()),
                        },
                    )
                    .await
                    .unwrap();
            }
            Self { repo }
        }

        fn titles(&self) -> TitlesUseCase<Repo, Repo> {
            TitlesUseCase::new(self.repo.clone(), self.repo.clone())
        }

        fn reviews(&self) -> ReviewsUseCase<Repo, Repo> {
            ReviewsUseCase::new(self.repo.clone(), self.repo.clone())
        }

        async fn title(&self, name: &str, category: &str, genres: &[&str]) -> TitleId {
            self.titles()
                .create(
                    &admin(),
                    TitleInput {
                        name: Some(name.into()),
                        year: Some(1999),
                        category: Some(category.into()),
                        genre: Some(genres.iter().map(|g| g.to_string()).collect()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap()
                .id
        }
    }

    #[tokio::test]
    async fn test_create_resolves_slugs() {
        let fx = Fixture::new().await;
        let id = fx.title("Matrix", "films", &["drama", "drama", "comedy"]).await;

        let title = fx.titles().get(&id).await.unwrap();
        assert_eq!(title.category.unwrap().slug.as_str(), "films");
        assert_eq!(title.genres.len(), 2);
        assert_eq!(title.rating, None);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_slug_and_future_year() {
        let fx = Fixture::new().await;

        let err = fx
            .titles()
            .create(
                &admin(),
                TitleInput {
                    name: Some("X".into()),
                    year: Some(2000),
                    genre: Some(vec!["western".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(m) if m.contains("western")));

        let err = fx
            .titles()
            .create(
                &admin(),
                TitleInput {
                    name: Some("X".into()),
                    year: Some(current_year() + 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_title_writes_are_admin_only() {
        let fx = Fixture::new().await;
        let id = fx.title("Matrix", "films", &[]).await;
        let user = actor("alice", UserRole::User);

        assert!(matches!(
            fx.titles().create(&user, TitleInput::default()).await.unwrap_err(),
            CatalogError::Forbidden
        ));
        assert!(matches!(
            fx.titles().delete(&user, &id).await.unwrap_err(),
            CatalogError::Forbidden
        ));
    }

    #[tokio::test]
    async fn test_filters() {
        let fx = Fixture::new().await;
        fx.title("Matrix", "films", &["drama"]).await;
        fx.title("Solaris", "books", &["drama"]).await;
        fx.title("Airplane", "films", &["comedy"]).await;

        let by = |filter: TitleFilter| {
            let titles = fx.titles();
            async move {
                titles
                    .list(filter)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.name)
                    .collect::<Vec<_>>()
            }
        };

        assert_eq!(
            by(TitleFilter {
                genre: Some("drama".into()),
                ..Default::default()
            })
            .await,
            ["Matrix", "Solaris"]
        );
        assert_eq!(
            by(TitleFilter {
                category: Some("films".into()),
                genre: Some("comedy".into()),
                ..Default::default()
            })
            .await,
            ["Airplane"]
        );
        assert_eq!(
            by(TitleFilter {
                name: Some("  sol ".into()),
                ..Default::default()
            })
            .await,
            ["Solaris"]
        );
        assert_eq!(by(TitleFilter::default()).await.len(), 3);
    }

    #[tokio::test]
    async fn test_deleting_category_clears_reference() {
        let fx = Fixture::new().await;
        let id = fx.title("Matrix", "films", &["drama"]).await;

        ClassifiersUseCase::new(fx.repo.clone(), ClassifierKind::Category)
            .delete(&admin(), "films")
            .await
            .unwrap();
        ClassifiersUseCase::new(fx.repo.clone(), ClassifierKind::Genre)
            .delete(&admin(), "drama")
            .await
            .unwrap();

        let title = fx.titles().get(&id).await.unwrap();
        assert!(title.category.is_none());
        assert!(title.genres.is_empty());
    }

    #[tokio::test]
    async fn test_rating_is_mean_of_scores() {
        let fx = Fixture::new().await;
        let id = fx.title("Matrix", "films", &[]).await;

        for (name, score) in [("a", 8), ("b", 6), ("c", 10)] {
            fx.reviews()
                .create(
                    &actor(name, UserRole::User),
                    &id,
                    ReviewInput {
                        text: Some("ok".into()),
                        score: Some(score),
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(fx.titles().get(&id).await.unwrap().rating, Some(8.0));
    }

    #[tokio::test]
    async fn test_patch_title() {
        let fx = Fixture::new().await;
        let id = fx.title("Matrix", "films", &["drama"]).await;

        let title = fx
            .titles()
            .update(
                &admin(),
                &id,
                TitleInput {
                    description: Some("Neo".into()),
                    category: Some("books".into()),
                    genre: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(title.name, "Matrix");
        assert_eq!(title.description.as_deref(), Some("Neo"));
        assert_eq!(title.category.unwrap().slug.as_str(), "books");
        assert!(title.genres.is_empty());

        let err = fx
            .titles()
            .update(&admin(), &TitleId::new(), TitleInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}

#[cfg(test)]
mod review_tests {
    use std::sync::Arc;

    use auth::authorizer::Actor;
    use auth::domain::value_object::user_role::UserRole;
    use kernel::id::{ReviewId, TitleId, UserId};

    use super::support::*;
    use crate::application::{
        CommentInput, CommentsUseCase, ReviewInput, ReviewsUseCase, TitleInput, TitlesUseCase,
    };
    use crate::domain::entity::Review;
    use crate::domain::repository::ReviewRepository;
    use crate::error::{CatalogError, CatalogResult};

    type Repo = InMemoryCatalogRepository;

    struct Fixture {
        repo: Arc<Repo>,
        title_id: TitleId,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(Repo::default());
        let title = TitlesUseCase::new(repo.clone(), repo.clone())
            .create(
                &admin(),
                TitleInput {
                    name: Some("Solaris".into()),
                    year: Some(1961),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        Fixture {
            repo,
            title_id: title.id,
        }
    }

    impl Fixture {
        fn reviews(&self) -> ReviewsUseCase<Repo, Repo> {
            ReviewsUseCase::new(self.repo.clone(), self.repo.clone())
        }

        fn comments(&self) -> CommentsUseCase<Repo, Repo> {
            CommentsUseCase::new(self.repo.clone(), self.repo.clone())
        }

        async fn review_by(&self, author: &Actor) -> ReviewId {
            self.reviews()
                .create(
                    author,
                    &self.title_id,
                    ReviewInput {
                        text: Some("Great".into()),
                        score: Some(9),
                    },
                )
                .await
                .unwrap()
                .id
        }
    }

    #[tokio::test]
    async fn test_one_review_per_author_per_title() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        fx.review_by(&alice).await;

        let err = fx
            .reviews()
            .create(
                &alice,
                &fx.title_id,
                ReviewInput {
                    text: Some("Again".into()),
                    score: Some(3),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(m) if m.contains("Solaris")));

        // Another author is fine
        fx.review_by(&actor("bob", UserRole::User)).await;
        assert_eq!(fx.reviews().list(&fx.title_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_review_validation() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);

        for (text, score) in [(Some("ok"), Some(0)), (Some("ok"), Some(11)), (Some(" "), Some(5)), (None, Some(5))] {
            let err = fx
                .reviews()
                .create(
                    &alice,
                    &fx.title_id,
                    ReviewInput {
                        text: text.map(String::from),
                        score,
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }

        let err = fx
            .reviews()
            .create(&alice, &TitleId::new(), ReviewInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_owner_and_moderator_may_delete() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        let bob = actor("bob", UserRole::User);
        let moderator = actor("mod", UserRole::Moderator);

        let first = fx.review_by(&alice).await;
        let err = fx
            .reviews()
            .delete(&bob, &fx.title_id, &first)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        fx.reviews()
            .delete(&moderator, &fx.title_id, &first)
            .await
            .unwrap();

        let own = fx.review_by(&bob).await;
        fx.reviews().delete(&bob, &fx.title_id, &own).await.unwrap();
        assert!(fx.reviews().list(&fx.title_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_updates_review() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        let id = fx.review_by(&alice).await;

        let review = fx
            .reviews()
            .update(
                &alice,
                &fx.title_id,
                &id,
                ReviewInput {
                    text: None,
                    score: Some(4),
                },
            )
            .await
            .unwrap();
        assert_eq!(review.score.get(), 4);
        assert_eq!(review.text, "Great");

        let err = fx
            .reviews()
            .update(&actor("eve", UserRole::User), &fx.title_id, &id, ReviewInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));
    }

    #[tokio::test]
    async fn test_deleting_review_deletes_comments() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        let review_id = fx.review_by(&alice).await;

        for text in ["first", "second"] {
            fx.comments()
                .create(
                    &actor("bob", UserRole::User),
                    &fx.title_id,
                    &review_id,
                    CommentInput {
                        text: Some(text.into()),
                    },
                )
                .await
                .unwrap();
        }
        assert_eq!(fx.repo.comment_count(), 2);

        fx.reviews()
            .delete(&alice, &fx.title_id, &review_id)
            .await
            .unwrap();
        assert_eq!(fx.repo.comment_count(), 0);
    }

    #[tokio::test]
    async fn test_comment_scoping_and_ownership() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        let bob = actor("bob", UserRole::User);
        let review_id = fx.review_by(&alice).await;

        // Review exists, but not under this title
        let err = fx
            .comments()
            .create(
                &bob,
                &TitleId::new(),
                &review_id,
                CommentInput {
                    text: Some("hi".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        let comment = fx
            .comments()
            .create(
                &bob,
                &fx.title_id,
                &review_id,
                CommentInput {
                    text: Some("hi".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.author_name, "bob");

        let err = fx
            .comments()
            .delete(&alice, &fx.title_id, &review_id, &comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Forbidden));

        let updated = fx
            .comments()
            .update(
                &bob,
                &fx.title_id,
                &review_id,
                &comment.id,
                CommentInput {
                    text: Some("edited".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "edited");

        fx.comments()
            .delete(&admin(), &fx.title_id, &review_id, &comment.id)
            .await
            .unwrap();
        assert!(
            fx.comments()
                .list(&fx.title_id, &review_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    /// Pre-check misses a concurrent insert; storage reports the duplicate
    #[derive(Clone)]
    struct RacingReviews {
        inner: Repo,
    }

    impl ReviewRepository for RacingReviews {
        async fn create(&self, review: &Review) -> CatalogResult<()> {
            ReviewRepository::create(&self.inner, review).await
        }

        async fn exists_for(&self, _: &UserId, _: &TitleId) -> CatalogResult<bool> {
            Ok(false)
        }

        async fn find(
            &self,
            title_id: &TitleId,
            review_id: &ReviewId,
        ) -> CatalogResult<Option<Review>> {
            ReviewRepository::find(&self.inner, title_id, review_id).await
        }

        async fn list(&self, title_id: &TitleId) -> CatalogResult<Vec<Review>> {
            ReviewRepository::list(&self.inner, title_id).await
        }

        async fn update(&self, review: &Review) -> CatalogResult<()> {
            ReviewRepository::update(&self.inner, review).await
        }

        async fn delete(&self, review_id: &ReviewId) -> CatalogResult<()> {
            ReviewRepository::delete(&self.inner, review_id).await
        }
    }

    #[tokio::test]
    async fn test_duplicate_from_storage_names_title() {
        let fx = fixture().await;
        let alice = actor("alice", UserRole::User);
        fx.review_by(&alice).await;

        let racing = ReviewsUseCase::new(
            Arc::new(RacingReviews {
                inner: (*fx.repo).clone(),
            }),
            fx.repo.clone(),
        );
        let err = racing
            .create(
                &alice,
                &fx.title_id,
                ReviewInput {
                    text: Some("Again".into()),
                    score: Some(2),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(m) if m.contains("Solaris")));
        assert_eq!(fx.reviews().list(&fx.title_id).await.unwrap().len(), 1);
    }
}

#[cfg(test)]
mod router_tests {
    use auth::authorizer::Actor;
    use auth::domain::value_object::user_role::UserRole;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::middleware::Next;
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::handlers::CatalogAppState;
    use crate::presentation::router::catalog_router;

    /// Router with a fixed caller in place of the token resolver
    fn app(repo: &InMemoryCatalogRepository, caller: Option<Actor>) -> Router {
        catalog_router(CatalogAppState::new(repo.clone())).layer(axum::middleware::from_fn(
            move |mut req: Request<Body>, next: Next| {
                let caller = caller.clone();
                async move {
                    if let Some(actor) = caller {
                        req.extensions_mut().insert(actor);
                    }
                    next.run(req).await
                }
            },
        ))
    }

    fn create_genre() -> Request<Body> {
        Request::post("/genres")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Drama", "slug": "drama"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_genres_admin_or_read_only() {
        let repo = InMemoryCatalogRepository::default();

        let res = app(&repo, None).oneshot(create_genre()).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app(&repo, Some(actor("alice", UserRole::User)))
            .oneshot(create_genre())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app(&repo, Some(admin())).oneshot(create_genre()).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app(&repo, None)
            .oneshot(Request::get("/genres").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "Drama", "slug": "drama"}]));
    }

    #[tokio::test]
    async fn test_review_create_requires_caller() {
        let repo = InMemoryCatalogRepository::default();
        let uri = format!("/titles/{}/reviews", kernel::id::TitleId::new());

        let res = app(&repo, None)
            .oneshot(
                Request::post(uri.as_str())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text": "hi", "score": 5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app(&repo, None)
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    async fn seeded(
        repo: &InMemoryCatalogRepository,
        author: &Actor,
    ) -> (kernel::id::TitleId, kernel::id::ReviewId) {
        use std::sync::Arc;

        use crate::application::{ReviewInput, ReviewsUseCase, TitleInput, TitlesUseCase};

        let repo = Arc::new(repo.clone());
        let title = TitlesUseCase::new(repo.clone(), repo.clone())
            .create(
                &admin(),
                TitleInput {
                    name: Some("Solaris".into()),
                    year: Some(1961),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let review = ReviewsUseCase::new(repo.clone(), repo)
            .create(
                author,
                &title.id,
                ReviewInput {
                    text: Some("Great".into()),
                    score: Some(9),
                },
            )
            .await
            .unwrap();
        (title.id, review.id)
    }

    fn json_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn problem(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_review_body_is_validation_problem() {
        let repo = InMemoryCatalogRepository::default();
        let (title_id, _) = seeded(&repo, &actor("alice", UserRole::User)).await;

        let res = app(&repo, Some(actor("bob", UserRole::User)))
            .oneshot(json_request(
                "POST",
                &format!("/titles/{title_id}/reviews"),
                r#"{"text": "hi", "score": "ten"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(problem(res).await["status"], 400);
    }

    #[tokio::test]
    async fn test_review_patch_checks_owner_before_body() {
        let repo = InMemoryCatalogRepository::default();
        let alice = actor("alice", UserRole::User);
        let (title_id, review_id) = seeded(&repo, &alice).await;
        let uri = format!("/titles/{title_id}/reviews/{review_id}");

        let res = app(&repo, Some(actor("bob", UserRole::User)))
            .oneshot(json_request("PATCH", &uri, r#"{"score": "x"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // The owner still gets the body checked
        let res = app(&repo, Some(alice))
            .oneshot(json_request("PATCH", &uri, r#"{"score": "x"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_id_is_not_found() {
        let repo = InMemoryCatalogRepository::default();
        let (title_id, _) = seeded(&repo, &actor("alice", UserRole::User)).await;

        for uri in [
            "/titles/not-a-uuid".to_string(),
            format!("/titles/{title_id}/reviews/42/comments"),
        ] {
            let res = app(&repo, None)
                .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
            assert_eq!(problem(res).await["status"], 404);
        }
    }
}
