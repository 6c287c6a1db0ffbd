//! Collaborator traits and error types

use thiserror::Error;

use crate::model::UrlRecord;

/// Errors surfaced by collaborator implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    Service(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for collaborator operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A newspaper resolved for a school, as returned by the external
/// search-API collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newspaper {
    /// Publication name
    pub name: String,
    /// Base URL of the publication's site
    pub link: String,
}

/// Persistence collaborator for classified article candidates.
///
/// Implementations must be idempotent and at-least-once safe: the durable
/// identity is the URL, and resubmitting a row whose URL already exists is
/// a no-op (the reference implementation upserts with
/// `ON CONFLICT (link) DO NOTHING`).
pub trait ArticleStore {
    /// Inserts classified rows, skipping URLs already present
    ///
    /// Callers hand over only regular rows; error rows (no URL identity)
    /// are filtered out beforehand.
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn insert_article_candidates(&mut self, rows: &[UrlRecord]) -> StoreResult<usize>;
}

/// External collaborator that resolves a school name to its student
/// newspaper via a web search API
pub trait NewspaperResolver {
    /// Looks up the newspaper associated with a school
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Newspaper))` - A publication was found
    /// * `Ok(None)` - No publication could be resolved for this school
    /// * `Err(StoreError)` - The lookup itself failed
    fn resolve_newspaper_link(&self, school_name: &str) -> StoreResult<Option<Newspaper>>;
}
