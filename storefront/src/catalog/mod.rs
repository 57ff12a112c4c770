//! Read-only catalog of books.
//!
//! The catalog is loaded once, validated, and shared behind an [`Arc`] by
//! every part of the session. All queries are linear scans that return new
//! vectors of shared [`Book`] handles; a miss is an empty result or `None`.

mod book;
mod query;

#[cfg(test)]
pub(crate) use book::fixtures;
pub use book::{Book, BookId, Genre, GenreFilter};
pub use query::{BrowseQuery, SortKey, sort};

use crate::error::CatalogError;
use std::collections::HashSet;
use std::sync::Arc;

/// Seed catalog compiled into the binary
const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Number of books in the home page picks
const FEATURED_LENGTH: usize = 5;

/// Number of books in the "you might also like" rail
const RELATED_LENGTH: usize = 4;

/// Immutable, validated list of books in catalog order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Arc<Book>>,
}

impl Catalog {
    /// Build a catalog from records, checking every invariant
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if ids repeat or a record has an invalid
    /// price, original price or rating.
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            book.validate()?;
            if !seen.insert(book.id.clone()) {
                return Err(CatalogError::DuplicateId(book.id.clone()));
            }
        }

        Ok(Self {
            books: books.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse and validate a JSON array of books
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let books: Vec<Book> = serde_json::from_str(json)?;
        Self::new(books)
    }

    /// The seed catalog shipped with the crate
    ///
    /// # Errors
    ///
    /// Only fails if the embedded data is corrupt.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Number of books
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog has no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books in catalog order
    #[must_use]
    pub fn books(&self) -> &[Arc<Book>] {
        &self.books
    }

    /// Exact identifier lookup
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Arc<Book>> {
        self.books.iter().find(|b| b.id.as_str() == id).cloned()
    }

    /// Books flagged as bestsellers, in catalog order
    #[must_use]
    pub fn bestsellers(&self) -> Vec<Arc<Book>> {
        self.books.iter().filter(|b| b.bestseller).cloned().collect()
    }

    /// Books of exactly this genre, in catalog order
    #[must_use]
    pub fn by_genre(&self, genre: Genre) -> Vec<Arc<Book>> {
        self.books.iter().filter(|b| b.genre == genre).cloned().collect()
    }

    /// Case-insensitive substring match on title or author
    ///
    /// An empty query returns every book.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Arc<Book>> {
        if query.is_empty() {
            return self.books.clone();
        }
        matching(&self.books, query)
    }

    /// Home page picks: the first five in-stock books
    #[must_use]
    pub fn featured(&self) -> Vec<Arc<Book>> {
        self.books
            .iter()
            .filter(|b| b.in_stock)
            .take(FEATURED_LENGTH)
            .cloned()
            .collect()
    }

    /// Up to four bestsellers other than `id`
    #[must_use]
    pub fn related(&self, id: &str) -> Vec<Arc<Book>> {
        self.books
            .iter()
            .filter(|b| b.bestseller && b.id.as_str() != id)
            .take(RELATED_LENGTH)
            .cloned()
            .collect()
    }

    /// The books-page pipeline
    #[must_use]
    #[tracing::instrument(skip(self), fields(results = tracing::field::Empty))]
    pub fn browse(&self, query: &BrowseQuery) -> Vec<Arc<Book>> {
        let found = if query.has_search() {
            matching(&self.books, &query.search)
        } else {
            self.books.clone()
        };

        let filtered: Vec<_> = found
            .into_iter()
            .filter(|b| query.genre.matches(b.genre))
            .filter(|b| !query.bestsellers_only || b.bestseller)
            .collect();

        let results = sort(&filtered, query.sort);
        tracing::Span::current().record("results", results.len());
        results
    }
}

fn matching(books: &[Arc<Book>], query: &str) -> Vec<Arc<Book>> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|b| b.matches_query(&needle))
        .cloned()
        .collect()
}
