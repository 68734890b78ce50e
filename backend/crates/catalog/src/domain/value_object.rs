//! Catalog Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

/// Maximum length for classifier and title names
pub const NAME_MAX_LENGTH: usize = 256;

/// Maximum slug length
pub const SLUG_MAX_LENGTH: usize = 50;

/// Natural key of a genre or category: `[-a-zA-Z0-9_]+`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn new(input: impl AsRef<str>) -> CatalogResult<Self> {
        let slug = input.as_ref().trim();
        if slug.is_empty() {
            return Err(CatalogError::Validation("slug: This field may not be blank.".into()));
        }
        if slug.len() > SLUG_MAX_LENGTH {
            return Err(CatalogError::Validation(format!(
                "slug: Ensure this field has no more than {SLUG_MAX_LENGTH} characters."
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CatalogError::Validation(
                "slug: Use only letters, numbers, underscores or hyphens.".into(),
            ));
        }
        Ok(Self(slug.to_string()))
    }

    /// Trusted value read back from storage
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// Review score, 1 to 10 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "i16")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> CatalogResult<Self> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(CatalogError::Validation(format!(
                "score: Score must be between {} and {}.",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value as u8))
    }

    /// Trusted value read back from storage (CHECK constraint keeps it in range)
    pub fn from_db(value: i16) -> Self {
        Self(value.clamp(i16::from(Self::MIN), i16::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        i16::from(score.0)
    }
}

/// Trimmed, non-blank text, optionally capped at `max` characters
pub fn required_text(field: &str, value: &str, max: Option<usize>) -> CatalogResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!(
            "{field}: This field may not be blank."
        )));
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(CatalogError::Validation(format!(
                "{field}: Ensure this field has no more than {max} characters."
            )));
        }
    }
    Ok(value.to_string())
}

/// Unwrap a required request field
pub fn required<T>(field: &str, value: Option<T>) -> CatalogResult<T> {
    value.ok_or_else(|| CatalogError::Validation(format!("{field}: This field is required.")))
}
