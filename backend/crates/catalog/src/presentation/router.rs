//! Catalog Router

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::domain::repository::CatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};
use crate::presentation::middleware::admin_or_read_only;

/// Genres, categories, titles, reviews and comments
///
/// Needs the auth crate's `resolve_actor` layered on top so that
/// [`auth::authorizer::Actor`] lands in the request extensions.
pub fn catalog_router<R>(state: CatalogAppState<R>) -> Router
where
    R: CatalogRepository,
{
    let admin_or_read_only_routes = Router::new()
        .route(
            "/genres",
            get(handlers::list_genres::<R>).post(handlers::create_genre::<R>),
        )
        .route(
            "/genres/{slug}",
            delete(handlers::delete_genre::<R>),
        )
        .route(
            "/categories",
            get(handlers::list_categories::<R>).post(handlers::create_category::<R>),
        )
        .route(
            "/categories/{slug}",
            delete(handlers::delete_category::<R>),
        )
        .route(
            "/titles",
            get(handlers::list_titles::<R>).post(handlers::create_title::<R>),
        )
        .route(
            "/titles/{title_id}",
            get(handlers::get_title::<R>)
                .patch(handlers::patch_title::<R>)
                .delete(handlers::delete_title::<R>),
        )
        .route_layer(middleware::from_fn(admin_or_read_only));

    let authored_routes = Router::new()
        .route(
            "/titles/{title_id}/reviews",
            get(handlers::list_reviews::<R>).post(handlers::create_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(handlers::get_review::<R>)
                .patch(handlers::patch_review::<R>)
                .delete(handlers::delete_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(handlers::list_comments::<R>).post(handlers::create_comment::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(handlers::get_comment::<R>)
                .patch(handlers::patch_comment::<R>)
                .delete(handlers::delete_comment::<R>),
        );

    admin_or_read_only_routes
        .merge(authored_routes)
        .with_state(state)
}
