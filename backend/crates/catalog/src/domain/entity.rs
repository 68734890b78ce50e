//! Catalog Entities

use auth::authorizer::Authored;
use chrono::{DateTime, Datelike, SubsecRound, Utc};
use kernel::id::{ClassifierId, CommentId, ReviewId, TitleId, UserId};

use crate::domain::value_object::{NAME_MAX_LENGTH, Score, Slug, required_text};
use crate::error::{CatalogError, CatalogResult};

// ============================================================================
// Classifiers
// ============================================================================

/// Genres and categories share one shape and differ only in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Genre,
    Category,
}

impl ClassifierKind {
    pub const fn label(&self) -> &'static str {
        match self {
            ClassifierKind::Genre => "Genre",
            ClassifierKind::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    pub id: ClassifierId,
    pub kind: ClassifierKind,
    pub name: String,
    pub slug: Slug,
}

impl Classifier {
    pub fn new(kind: ClassifierKind, name: &str, slug: &str) -> CatalogResult<Self> {
        Ok(Self {
            id: ClassifierId::new(),
            kind,
            name: required_text("name", name, Some(NAME_MAX_LENGTH))?,
            slug: Slug::new(slug)?,
        })
    }
}

// ============================================================================
// Title
// ============================================================================

/// A creative work
///
/// `category` and `genres` are the resolved classifiers; `rating` is filled
/// in by the read side and ignored on writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Classifier>,
    pub genres: Vec<Classifier>,
    pub rating: Option<f64>,
}

impl Title {
    pub fn new(name: &str, year: i32) -> CatalogResult<Self> {
        Ok(Self {
            id: TitleId::new(),
            name: Self::validate_name(name)?,
            year: Self::validate_year(year, current_year())?,
            description: None,
            category: None,
            genres: Vec::new(),
            rating: None,
        })
    }

    pub fn validate_name(name: &str) -> CatalogResult<String> {
        required_text("name", name, Some(NAME_MAX_LENGTH))
    }

    /// Release year may not lie in the future
    pub fn validate_year(year: i32, current_year: i32) -> CatalogResult<i32> {
        if year > current_year {
            return Err(CatalogError::Validation(format!(
                "year: Year cannot be later than {current_year}."
            )));
        }
        Ok(year)
    }

    /// Blank descriptions are stored as `None`
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

// ============================================================================
// Review / Comment
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub title_id: TitleId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub score: Score,
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn new(
        title_id: TitleId,
        author_id: UserId,
        author_name: impl Into<String>,
        text: &str,
        score: Score,
    ) -> CatalogResult<Self> {
        Ok(Self {
            id: ReviewId::new(),
            title_id,
            author_id,
            author_name: author_name.into(),
            text: required_text("text", text, None)?,
            score,
            pub_date: Utc::now().trunc_subsecs(6),
        })
    }
}

impl Authored for Review {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub review_id: ReviewId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        review_id: ReviewId,
        author_id: UserId,
        author_name: impl Into<String>,
        text: &str,
    ) -> CatalogResult<Self> {
        Ok(Self {
            id: CommentId::new(),
            review_id,
            author_id,
            author_name: author_name.into(),
            text: required_text("text", text, None)?,
            pub_date: Utc::now().trunc_subsecs(6),
        })
    }
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_year_not_in_future() {
        assert_eq!(Title::validate_year(2020, 2024).unwrap(), 2020);
        assert_eq!(Title::validate_year(2024, 2024).unwrap(), 2024);
        assert!(Title::validate_year(2025, 2024).is_err());
        assert!(Title::new("Future", current_year() + 1).is_err());
    }

    #[test]
    fn test_title_blank_description_is_none() {
        let mut title = Title::new("Solaris", 1961).unwrap();
        title.set_description(Some("   ".into()));
        assert_eq!(title.description, None);
        title.set_description(Some(" novel ".into()));
        assert_eq!(title.description.as_deref(), Some("novel"));
    }

    #[test]
    fn test_classifier_validation() {
        assert!(Classifier::new(ClassifierKind::Genre, "Drama", "drama").is_ok());
        assert!(Classifier::new(ClassifierKind::Genre, "", "drama").is_err());
        assert!(Classifier::new(ClassifierKind::Category, "Films", "films!").is_err());
    }

    #[test]
    fn test_review_requires_text() {
        let score = Score::new(5).unwrap();
        assert!(Review::new(TitleId::new(), UserId::new(), "alice", "  ", score).is_err());
        let review = Review::new(TitleId::new(), UserId::new(), "alice", "Fine", score).unwrap();
        assert_eq!(review.author_id(), review.author_id);
    }
}
