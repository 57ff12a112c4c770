//! Sorting and the books-page query.

use super::book::{Book, GenreFilter};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Sort orders offered on the books page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Title, ascending
    #[default]
    Title,
    /// Price, low to high
    PriceAsc,
    /// Price, high to low
    PriceDesc,
    /// Rating, best first
    Rating,
}

impl SortKey {
    /// Query-string form of the key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Rating => "rating",
        }
    }

    fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => title_order(&a.title, &b.title),
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

/// Case-insensitive; titles that differ only in case put lowercase first
fn title_order(a: &str, b: &str) -> Ordering {
    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().flat_map(char::to_lowercase)
    }

    folded(a).cmp(folded(b)).then_with(|| b.cmp(a))
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            other => Err(CatalogError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Stable sort into a new sequence; the input is left untouched.
#[must_use]
pub fn sort(books: &[Arc<Book>], key: SortKey) -> Vec<Arc<Book>> {
    let mut sorted = books.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Parameters of the books page.
///
/// Applied in order: search, genre, bestseller-only, sort.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    /// Free-text search; blank means no search
    pub search: String,
    /// Genre restriction
    pub genre: GenreFilter,
    /// Keep only bestsellers
    pub bestsellers_only: bool,
    /// Result order
    pub sort: SortKey,
}

impl BrowseQuery {
    /// Query that returns the whole catalog sorted by title
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Set the genre filter
    #[must_use]
    pub const fn genre(mut self, genre: GenreFilter) -> Self {
        self.genre = genre;
        self
    }

    /// Keep only bestsellers
    #[must_use]
    pub const fn bestsellers_only(mut self) -> Self {
        self.bestsellers_only = true;
        self
    }

    /// Set the sort order
    #[must_use]
    pub const fn sort_by(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub(crate) fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::book::fixtures::book;

    fn shelf() -> Vec<Arc<Book>> {
        let mut emma = book("1", "Emma", 9.0);
        emma.rating = 4.1;
        let mut dune = book("2", "Dune", 19.0);
        dune.rating = 4.8;
        let mut beloved = book("3", "Beloved", 9.0);
        beloved.rating = 4.1;
        vec![Arc::new(emma), Arc::new(dune), Arc::new(beloved)]
    }

    fn ids(books: &[Arc<Book>]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn sort_keys_parse() {
        for key in [SortKey::Title, SortKey::PriceAsc, SortKey::PriceDesc, SortKey::Rating] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!(matches!(
            "newest".parse::<SortKey>(),
            Err(CatalogError::UnknownSortKey(_))
        ));
    }

    #[test]
    fn sort_orders() {
        let books = shelf();
        assert_eq!(ids(&sort(&books, SortKey::Title)), vec!["3", "2", "1"]);
        assert_eq!(ids(&sort(&books, SortKey::PriceDesc)), vec!["2", "1", "3"]);
        assert_eq!(ids(&sort(&books, SortKey::Rating)), vec!["2", "1", "3"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let books: Vec<_> = [("1", "the road"), ("2", "Beloved"), ("3", "The Road"), ("4", "ulysses")]
            .into_iter()
            .map(|(id, title)| Arc::new(book(id, title, 1.0)))
            .collect();
        assert_eq!(ids(&sort(&books, SortKey::Title)), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn sort_is_stable_and_leaves_input_alone() {
        let books = shelf();
        // Emma and Beloved tie on price; input order is kept
        assert_eq!(ids(&sort(&books, SortKey::PriceAsc)), vec!["1", "3", "2"]);
        assert_eq!(ids(&books), vec!["1", "2", "3"]);
    }

    #[test]
    fn blank_search_is_no_search() {
        assert!(!BrowseQuery::new().search("   ").has_search());
        assert!(BrowseQuery::new().search(" dune ").has_search());
    }
}
