//! Book records and genres.

use crate::error::CatalogError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Wrap a raw identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed set of genres a book can belong to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    /// Fiction
    Fiction,
    /// Non-Fiction
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    /// Mystery
    Mystery,
    /// Romance
    Romance,
    /// Science Fiction
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    /// Fantasy
    Fantasy,
    /// Children's
    #[serde(rename = "Children's")]
    Childrens,
    /// History
    History,
}

impl Genre {
    /// Every genre, in the order the home page lists them
    pub const ALL: [Self; 8] = [
        Self::Fiction,
        Self::NonFiction,
        Self::Mystery,
        Self::Romance,
        Self::ScienceFiction,
        Self::Fantasy,
        Self::Childrens,
        Self::History,
    ];

    /// Display name, identical to the serialized form
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
            Self::Mystery => "Mystery",
            Self::Romance => "Romance",
            Self::ScienceFiction => "Science Fiction",
            Self::Fantasy => "Fantasy",
            Self::Childrens => "Children's",
            Self::History => "History",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.name() == s)
            .ok_or_else(|| CatalogError::UnknownGenre(s.to_string()))
    }
}

/// Genre selection on the browse page
///
/// `All` is not a genre: it means "do not filter".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GenreFilter {
    /// No genre restriction
    #[default]
    All,
    /// Only books of this genre
    Only(Genre),
}

impl GenreFilter {
    /// Whether a book of `genre` passes this filter
    #[must_use]
    pub fn matches(self, genre: Genre) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == genre,
        }
    }
}

impl FromStr for GenreFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// A catalog entry. Loaded once and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier
    pub id: BookId,
    /// Title
    pub title: String,
    /// Author display name
    pub author: String,
    /// Genre
    pub genre: Genre,
    /// Current selling price
    pub price: f64,
    /// Pre-sale price, present only while the book is on sale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Average rating between 0 and 5
    pub rating: f64,
    /// Number of reviews behind `rating`
    #[serde(rename = "reviews")]
    pub review_count: u32,
    /// Whether the book can currently be shipped
    pub in_stock: bool,
    /// Editorial bestseller flag
    pub bestseller: bool,
    /// Cover image reference
    #[serde(rename = "cover")]
    pub cover_url: String,
    /// Blurb
    pub description: String,
    /// Page count
    #[serde(rename = "pages")]
    pub page_count: u32,
    /// Publisher
    pub publisher: String,
    /// First publication date
    pub published_date: NaiveDate,
    /// ISBN-13 as printed
    pub isbn: String,
}

impl Book {
    /// Whether an original price is shown struck through
    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    /// Rounded percentage saved against the original price
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded to 0..=100
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|original| *original > 0.0)?;
        let percent = ((1.0 - self.price / original) * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u32)
    }

    /// Case-insensitive match of an already lower-cased needle against
    /// title or author
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    /// Check the record invariants
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(CatalogError::InvalidPrice(self.id.clone()));
        }

        if let Some(original) = self.original_price {
            if !(original.is_finite() && original >= self.price) {
                return Err(CatalogError::InvalidOriginalPrice(self.id.clone()));
            }
        }

        if !(0.0..=5.0).contains(&self.rating) {
            return Err(CatalogError::InvalidRating(self.id.clone()));
        }

        Ok(())
    }
}
