//! HTTP Handlers

use auth::authorizer::Actor;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::{CommentId, ReviewId, TitleId};
use std::sync::Arc;

use crate::application::{ClassifiersUseCase, CommentsUseCase, ReviewsUseCase, TitlesUseCase};
use crate::domain::entity::ClassifierKind;
use crate::domain::repository::CatalogRepository;
use crate::error::CatalogResult;
use crate::presentation::dto::{
    ClassifierRequest, ClassifierResponse, CommentRequest, CommentResponse, ReviewRequest,
    ReviewResponse, SearchQuery, TitleListQuery, TitleRequest, TitleResponse,
};
use crate::presentation::extract::{ApiJson, ApiPath, parse_json};

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: CatalogRepository,
{
    pub repo: Arc<R>,
}

impl<R> CatalogAppState<R>
where
    R: CatalogRepository,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    fn classifiers(&self, kind: ClassifierKind) -> ClassifiersUseCase<R> {
        ClassifiersUseCase::new(self.repo.clone(), kind)
    }

    fn titles(&self) -> TitlesUseCase<R, R> {
        TitlesUseCase::new(self.repo.clone(), self.repo.clone())
    }

    fn reviews(&self) -> ReviewsUseCase<R, R> {
        ReviewsUseCase::new(self.repo.clone(), self.repo.clone())
    }

    fn comments(&self) -> CommentsUseCase<R, R> {
        CommentsUseCase::new(self.repo.clone(), self.repo.clone())
    }
}

// ============================================================================
// Genres / Categories
// ============================================================================

async fn list_classifiers<R: CatalogRepository>(
    state: &CatalogAppState<R>,
    kind: ClassifierKind,
    query: SearchQuery,
) -> CatalogResult<Json<Vec<ClassifierResponse>>> {
    let items = state.classifiers(kind).list(query.search.as_deref()).await?;
    Ok(Json(items.iter().map(ClassifierResponse::from).collect()))
}

async fn create_classifier<R: CatalogRepository>(
    state: &CatalogAppState<R>,
    kind: ClassifierKind,
    actor: &Actor,
    req: ClassifierRequest,
) -> CatalogResult<(StatusCode, Json<ClassifierResponse>)> {
    let created = state.classifiers(kind).create(actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ClassifierResponse::from(&created))))
}

async fn delete_classifier<R: CatalogRepository>(
    state: &CatalogAppState<R>,
    kind: ClassifierKind,
    actor: &Actor,
    slug: &str,
) -> CatalogResult<StatusCode> {
    state.classifiers(kind).delete(actor, slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /genres?search=
pub async fn list_genres<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> CatalogResult<Json<Vec<ClassifierResponse>>> {
    list_classifiers(&state, ClassifierKind::Genre, query).await
}

/// POST /genres
pub async fn create_genre<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiJson(req): ApiJson<ClassifierRequest>,
) -> CatalogResult<impl IntoResponse> {
    create_classifier(&state, ClassifierKind::Genre, &actor, req).await
}

/// DELETE /genres/{slug}
pub async fn delete_genre<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath(slug): ApiPath<String>,
) -> CatalogResult<StatusCode> {
    delete_classifier(&state, ClassifierKind::Genre, &actor, &slug).await
}

/// GET /categories?search=
pub async fn list_categories<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> CatalogResult<Json<Vec<ClassifierResponse>>> {
    list_classifiers(&state, ClassifierKind::Category, query).await
}

/// POST /categories
pub async fn create_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiJson(req): ApiJson<ClassifierRequest>,
) -> CatalogResult<impl IntoResponse> {
    create_classifier(&state, ClassifierKind::Category, &actor, req).await
}

/// DELETE /categories/{slug}
pub async fn delete_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath(slug): ApiPath<String>,
) -> CatalogResult<StatusCode> {
    delete_classifier(&state, ClassifierKind::Category, &actor, &slug).await
}

// ============================================================================
// Titles
// ============================================================================

/// GET /titles?genre=&category=&name=&year=
pub async fn list_titles<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<TitleListQuery>,
) -> CatalogResult<Json<Vec<TitleResponse>>> {
    let titles = state.titles().list(query.into()).await?;
    Ok(Json(titles.iter().map(TitleResponse::from).collect()))
}

/// POST /titles
pub async fn create_title<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiJson(req): ApiJson<TitleRequest>,
) -> CatalogResult<impl IntoResponse> {
    let title = state.titles().create(&actor, req.into()).await?;
    Ok((StatusCode::CREATED, Json(TitleResponse::from(&title))))
}

/// GET /titles/{title_id}
pub async fn get_title<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath(title_id): ApiPath<TitleId>,
) -> CatalogResult<Json<TitleResponse>> {
    let title = state.titles().get(&title_id).await?;
    Ok(Json(TitleResponse::from(&title)))
}

/// PATCH /titles/{title_id}
pub async fn patch_title<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath(title_id): ApiPath<TitleId>,
    ApiJson(req): ApiJson<TitleRequest>,
) -> CatalogResult<Json<TitleResponse>> {
    let title = state.titles().update(&actor, &title_id, req.into()).await?;
    Ok(Json(TitleResponse::from(&title)))
}

/// DELETE /titles/{title_id}
pub async fn delete_title<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath(title_id): ApiPath<TitleId>,
) -> CatalogResult<StatusCode> {
    state.titles().delete(&actor, &title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Reviews
// ============================================================================

/// GET /titles/{title_id}/reviews
pub async fn list_reviews<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath(title_id): ApiPath<TitleId>,
) -> CatalogResult<Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews().list(&title_id).await?;
    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// POST /titles/{title_id}/reviews
pub async fn create_review<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath(title_id): ApiPath<TitleId>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> CatalogResult<impl IntoResponse> {
    let review = state.reviews().create(&actor, &title_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// GET /titles/{title_id}/reviews/{review_id}
pub async fn get_review<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath((title_id, review_id)): ApiPath<(TitleId, ReviewId)>,
) -> CatalogResult<Json<ReviewResponse>> {
    let review = state.reviews().get(&title_id, &review_id).await?;
    Ok(Json(ReviewResponse::from(&review)))
}

/// PATCH /titles/{title_id}/reviews/{review_id}
pub async fn patch_review<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath((title_id, review_id)): ApiPath<(TitleId, ReviewId)>,
    body: Bytes,
) -> CatalogResult<Json<ReviewResponse>> {
    let reviews = state.reviews();
    let review = reviews.editable(&actor, &title_id, &review_id).await?;
    let req: ReviewRequest = parse_json(&body)?;
    let review = reviews.apply(&actor, review, req.into()).await?;
    Ok(Json(ReviewResponse::from(&review)))
}

/// DELETE /titles/{title_id}/reviews/{review_id}
pub async fn delete_review<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath((title_id, review_id)): ApiPath<(TitleId, ReviewId)>,
) -> CatalogResult<StatusCode> {
    state.reviews().delete(&actor, &title_id, &review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// GET /titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath((title_id, review_id)): ApiPath<(TitleId, ReviewId)>,
) -> CatalogResult<Json<Vec<CommentResponse>>> {
    let comments = state.comments().list(&title_id, &review_id).await?;
    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

/// POST /titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath((title_id, review_id)): ApiPath<(TitleId, ReviewId)>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> CatalogResult<impl IntoResponse> {
    let comment = state
        .comments()
        .create(&actor, &title_id, &review_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// GET /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(TitleId, ReviewId, CommentId)>,
) -> CatalogResult<Json<CommentResponse>> {
    let comment = state
        .comments()
        .get(&title_id, &review_id, &comment_id)
        .await?;
    Ok(Json(CommentResponse::from(&comment)))
}

/// PATCH /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn patch_comment<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(TitleId, ReviewId, CommentId)>,
    body: Bytes,
) -> CatalogResult<Json<CommentResponse>> {
    let comments = state.comments();
    let comment = comments
        .editable(&actor, &title_id, &review_id, &comment_id)
        .await?;
    let req: CommentRequest = parse_json(&body)?;
    let comment = comments.apply(&actor, comment, req.into()).await?;
    Ok(Json(CommentResponse::from(&comment)))
}

/// DELETE /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    actor: Actor,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(TitleId, ReviewId, CommentId)>,
) -> CatalogResult<StatusCode> {
    state
        .comments()
        .delete(&actor, &title_id, &review_id, &comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
