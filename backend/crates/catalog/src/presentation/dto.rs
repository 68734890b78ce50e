//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ReviewId, TitleId};
use serde::{Deserialize, Serialize};

use crate::application::{ClassifierInput, CommentInput, ReviewInput, TitleInput};
use crate::domain::entity::{Classifier, Comment, Review, Title};
use crate::domain::repository::TitleFilter;

// ============================================================================
// Genres / Categories
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl From<ClassifierRequest> for ClassifierInput {
    fn from(req: ClassifierRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifierResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Classifier> for ClassifierResponse {
    fn from(c: &Classifier) -> Self {
        Self {
            name: c.name.clone(),
            slug: c.slug.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

// ============================================================================
// Titles
// ============================================================================

/// POST /titles and PATCH /titles/{title_id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

impl From<TitleRequest> for TitleInput {
    fn from(req: TitleRequest) -> Self {
        Self {
            name: req.name,
            year: req.year,
            description: req.description,
            category: req.category,
            genre: req.genre,
        }
    }
}

/// The one title representation, for reads and write responses alike
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: TitleId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<ClassifierResponse>,
    pub category: Option<ClassifierResponse>,
}

impl From<&Title> for TitleResponse {
    fn from(t: &Title) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            year: t.year,
            rating: t.rating,
            description: t.description.clone(),
            genre: t.genres.iter().map(ClassifierResponse::from).collect(),
            category: t.category.as_ref().map(ClassifierResponse::from),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleListQuery {
    pub genre: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

impl From<TitleListQuery> for TitleFilter {
    fn from(q: TitleListQuery) -> Self {
        Self {
            genre: q.genre,
            category: q.category,
            name: q.name,
            year: q.year,
        }
    }
}

// ============================================================================
// Reviews / Comments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    pub text: Option<String>,
    pub score: Option<i64>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(req: ReviewRequest) -> Self {
        Self {
            text: req.text,
            score: req.score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: ReviewId,
    pub title: TitleId,
    /// Author's username
    pub author: String,
    pub text: String,
    pub score: u8,
    pub pub_date: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(r: &Review) -> Self {
        Self {
            id: r.id,
            title: r.title_id,
            author: r.author_name.clone(),
            text: r.text.clone(),
            score: r.score.get(),
            pub_date: r.pub_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

impl From<CommentRequest> for CommentInput {
    fn from(req: CommentRequest) -> Self {
        Self { text: req.text }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: CommentId,
    pub review: ReviewId,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id,
            review: c.review_id,
            author: c.author_name.clone(),
            text: c.text.clone(),
            pub_date: c.pub_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ClassifierKind;

    #[test]
    fn test_title_response_shape() {
        let mut title = Title::new("Solaris", 1961).unwrap();
        title.category = Some(Classifier::new(ClassifierKind::Category, "Books", "books").unwrap());

        let json = serde_json::to_value(TitleResponse::from(&title)).unwrap();
        assert_eq!(json["name"], "Solaris");
        assert!(json["rating"].is_null());
        assert_eq!(json["category"]["slug"], "books");
        assert_eq!(json["genre"], serde_json::json!([]));
    }
}
