//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{ClassifierId, CommentId, ReviewId, TitleId, UserId};
use kernel::query::escape_like;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::application::classifiers::slug_taken;
use crate::domain::entity::{Classifier, ClassifierKind, Comment, Review, Title};
use crate::domain::repository::{
    ClassifierRepository, CommentRepository, ReviewRepository, TitleFilter, TitleRepository,
};
use crate::domain::value_object::{Score, Slug};
use crate::error::{CatalogError, CatalogResult};

/// Unique constraint names from the catalog migration
const GENRES_SLUG_KEY: &str = "genres_slug_key";
const CATEGORIES_SLUG_KEY: &str = "categories_slug_key";
const REVIEWS_AUTHOR_TITLE_KEY: &str = "reviews_author_title_key";

/// Table and key column per classifier kind
fn classifier_table(kind: ClassifierKind) -> (&'static str, &'static str) {
    match kind {
        ClassifierKind::Genre => ("genres", "genre_id"),
        ClassifierKind::Category => ("categories", "category_id"),
    }
}

const TITLE_SELECT: &str = r#"
    SELECT
        t.title_id,
        t.name,
        t.year,
        t.description,
        c.category_id,
        c.name AS category_name,
        c.slug AS category_slug,
        (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.title_id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.category_id = t.category_id
"#;

const REVIEW_SELECT: &str = r#"
    SELECT r.review_id, r.title_id, r.author_id, u.username AS author_name,
           r.text, r.score, r.pub_date
    FROM reviews r
    JOIN users u ON u.user_id = r.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT m.comment_id, m.review_id, m.author_id, u.username AS author_name,
           m.text, m.pub_date
    FROM comments m
    JOIN users u ON u.user_id = m.author_id
"#;

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach genres to already-fetched title rows
    async fn with_genres(&self, rows: Vec<TitleRow>) -> CatalogResult<Vec<Title>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.title_id).collect();
        let genre_rows = sqlx::query_as::<_, TitleGenreRow>(
            r#"
            SELECT tg.title_id, g.genre_id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.genre_id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<Uuid, Vec<Classifier>> = HashMap::new();
        for row in genre_rows {
            genres.entry(row.title_id).or_default().push(Classifier {
                id: ClassifierId::from_uuid(row.genre_id),
                kind: ClassifierKind::Genre,
                name: row.name,
                slug: Slug::from_db(row.slug),
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let title_genres = genres.remove(&row.title_id).unwrap_or_default();
                row.into_title(title_genres)
            })
            .collect())
    }

    async fn replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        title: &Title,
    ) -> CatalogResult<()> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title.id.as_uuid())
            .execute(&mut **tx)
            .await?;

        let genre_ids: Vec<Uuid> = title.genres.iter().map(|g| *g.id.as_uuid()).collect();
        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO title_genres (title_id, genre_id) SELECT $1, UNNEST($2::uuid[])",
            )
            .bind(title.id.as_uuid())
            .bind(&genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

fn constraint_of(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

// ============================================================================
// Classifier Repository Implementation
// ============================================================================

impl ClassifierRepository for PgCatalogRepository {
    async fn create(&self, classifier: &Classifier) -> CatalogResult<()> {
        let (table, key) = classifier_table(classifier.kind);
        let sql = format!("INSERT INTO {table} ({key}, name, slug) VALUES ($1, $2, $3)");
        sqlx::query(&sql)
            .bind(classifier.id.as_uuid())
            .bind(&classifier.name)
            .bind(classifier.slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_of(&e) {
                Some(GENRES_SLUG_KEY | CATEGORIES_SLUG_KEY) => {
                    slug_taken(classifier.kind, &classifier.slug)
                }
                _ => CatalogError::Database(e),
            })?;
        Ok(())
    }

    async fn list(
        &self,
        kind: ClassifierKind,
        search: Option<&str>,
    ) -> CatalogResult<Vec<Classifier>> {
        let (table, key) = classifier_table(kind);
        let sql = format!(
            "SELECT {key} AS id, name, slug FROM {table} \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
             ORDER BY name"
        );
        let rows = sqlx::query_as::<_, ClassifierRow>(&sql)
            .bind(search.map(escape_like))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_classifier(kind)).collect())
    }

    async fn find_by_slug(
        &self,
        kind: ClassifierKind,
        slug: &Slug,
    ) -> CatalogResult<Option<Classifier>> {
        let (table, key) = classifier_table(kind);
        let sql = format!("SELECT {key} AS id, name, slug FROM {table} WHERE slug = $1");
        let row = sqlx::query_as::<_, ClassifierRow>(&sql)
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_classifier(kind)))
    }

    async fn delete_by_slug(&self, kind: ClassifierKind, slug: &Slug) -> CatalogResult<()> {
        // Titles lose the genre link (CASCADE) or the category (SET NULL)
        let (table, _) = classifier_table(kind);
        let sql = format!("DELETE FROM {table} WHERE slug = $1");
        let result = sqlx::query(&sql)
            .bind(slug.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found(kind.label()));
        }
        Ok(())
    }
}

// ============================================================================
// Title Repository Implementation
// ============================================================================

impl TitleRepository for PgCatalogRepository {
    async fn create(&self, title: &Title) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO titles (title_id, name, year, description, category_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(title.id.as_uuid())
        .bind(&title.name)
        .bind(title.year)
        .bind(title.description.as_deref())
        .bind(title.category.as_ref().map(|c| *c.id.as_uuid()))
        .execute(&mut *tx)
        .await?;

        Self::replace_genres(&mut tx, title).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn find(&self, title_id: &TitleId) -> CatalogResult<Option<Title>> {
        let sql = format!("{TITLE_SELECT} WHERE t.title_id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(title_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_genres(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &TitleFilter) -> CatalogResult<Vec<Title>> {
        let sql = format!(
            r#"{TITLE_SELECT}
            WHERE ($1::text IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.genre_id = tg.genre_id
                    WHERE tg.title_id = t.title_id AND g.slug = $1))
              AND ($2::text IS NULL OR c.slug = $2)
              AND ($3::text IS NULL OR t.name ILIKE '%' || $3 || '%')
              AND ($4::int IS NULL OR t.year = $4)
            ORDER BY t.name, t.title_id
            "#
        );
        let rows = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(filter.genre.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.name.as_deref().map(escape_like))
            .bind(filter.year)
            .fetch_all(&self.pool)
            .await?;

        self.with_genres(rows).await
    }

    async fn update(&self, title: &Title) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE titles SET
                name = $2,
                year = $3,
                description = $4,
                category_id = $5
            WHERE title_id = $1
            "#,
        )
        .bind(title.id.as_uuid())
        .bind(&title.name)
        .bind(title.year)
        .bind(title.description.as_deref())
        .bind(title.category.as_ref().map(|c| *c.id.as_uuid()))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Title"));
        }

        Self::replace_genres(&mut tx, title).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, title_id: &TitleId) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM titles WHERE title_id = $1")
            .bind(title_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Title"));
        }
        Ok(())
    }
}

// ============================================================================
// Review Repository Implementation
// ============================================================================

impl ReviewRepository for PgCatalogRepository {
    async fn create(&self, review: &Review) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (review_id, title_id, author_id, text, score, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.title_id.as_uuid())
        .bind(review.author_id.as_uuid())
        .bind(&review.text)
        .bind(i16::from(review.score))
        .bind(review.pub_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match constraint_of(&e) {
            Some(REVIEWS_AUTHOR_TITLE_KEY) => CatalogError::DuplicateReview,
            _ => CatalogError::Database(e),
        })?;

        Ok(())
    }

    async fn exists_for(&self, author_id: &UserId, title_id: &TitleId) -> CatalogResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE author_id = $1 AND title_id = $2)",
        )
        .bind(author_id.as_uuid())
        .bind(title_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find(&self, title_id: &TitleId, review_id: &ReviewId) -> CatalogResult<Option<Review>> {
        let sql = format!("{REVIEW_SELECT} WHERE r.review_id = $1 AND r.title_id = $2");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review_id.as_uuid())
            .bind(title_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ReviewRow::into_review))
    }

    async fn list(&self, title_id: &TitleId) -> CatalogResult<Vec<Review>> {
        let sql = format!("{REVIEW_SELECT} WHERE r.title_id = $1 ORDER BY r.pub_date DESC");
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(title_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }

    async fn update(&self, review: &Review) -> CatalogResult<()> {
        let result = sqlx::query("UPDATE reviews SET text = $2, score = $3 WHERE review_id = $1")
            .bind(review.id.as_uuid())
            .bind(&review.text)
            .bind(i16::from(review.score))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Review"));
        }
        Ok(())
    }

    async fn delete(&self, review_id: &ReviewId) -> CatalogResult<()> {
        // Comments go with the review (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Review"));
        }
        Ok(())
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgCatalogRepository {
    async fn create(&self, comment: &Comment) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, review_id, author_id, text, pub_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id.as_uuid())
        .bind(comment.review_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(&comment.text)
        .bind(comment.pub_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> CatalogResult<Option<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE m.comment_id = $1 AND m.review_id = $2");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id.as_uuid())
            .bind(review_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn list(&self, review_id: &ReviewId) -> CatalogResult<Vec<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE m.review_id = $1 ORDER BY m.pub_date DESC");
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(review_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn update(&self, comment: &Comment) -> CatalogResult<()> {
        let result = sqlx::query("UPDATE comments SET text = $2 WHERE comment_id = $1")
            .bind(comment.id.as_uuid())
            .bind(&comment.text)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Comment"));
        }
        Ok(())
    }

    async fn delete(&self, comment_id: &CommentId) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("Comment"));
        }
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ClassifierRow {
    id: Uuid,
    name: String,
    slug: String,
}

impl ClassifierRow {
    fn into_classifier(self, kind: ClassifierKind) -> Classifier {
        Classifier {
            id: ClassifierId::from_uuid(self.id),
            kind,
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    title_id: Uuid,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<Uuid>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

impl TitleRow {
    fn into_title(self, genres: Vec<Classifier>) -> Title {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Classifier {
                id: ClassifierId::from_uuid(id),
                kind: ClassifierKind::Category,
                name,
                slug: Slug::from_db(slug),
            }),
            _ => None,
        };

        Title {
            id: TitleId::from_uuid(self.title_id),
            name: self.name,
            year: self.year,
            description: self.description,
            category,
            genres,
            rating: self.rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleGenreRow {
    title_id: Uuid,
    genre_id: Uuid,
    name: String,
    slug: String,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    review_id: Uuid,
    title_id: Uuid,
    author_id: Uuid,
    author_name: String,
    text: String,
    score: i16,
    pub_date: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Review {
        Review {
            id: ReviewId::from_uuid(self.review_id),
            title_id: TitleId::from_uuid(self.title_id),
            author_id: UserId::from_uuid(self.author_id),
            author_name: self.author_name,
            text: self.text,
            score: Score::from_db(self.score),
            pub_date: self.pub_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    review_id: Uuid,
    author_id: Uuid,
    author_name: String,
    text: String,
    pub_date: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::from_uuid(self.comment_id),
            review_id: ReviewId::from_uuid(self.review_id),
            author_id: UserId::from_uuid(self.author_id),
            author_name: self.author_name,
            text: self.text,
            pub_date: self.pub_date,
        }
    }
}
