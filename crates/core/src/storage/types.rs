use serde::{Deserialize, Serialize};

/// Maximum number of notes a single listing may return.
pub const MAX_LIMIT: u32 = 100;

/// Default page size for note listings.
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination and search parameters for note listings.
///
/// The query participates in cache keys, so two queries that compare
/// equal always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteQuery {
    pub skip: u32,
    pub limit: u32,
    pub search: String,
}

impl NoteQuery {
    /// Builds a query, clamping the limit into `1..=MAX_LIMIT`.
    pub fn new(skip: u32, limit: u32, search: impl Into<String>) -> Self {
        Self {
            skip,
            limit: limit.clamp(1, MAX_LIMIT),
            search: search.into(),
        }
    }

    /// Checks whether a note's text satisfies the search filter.
    ///
    /// An empty filter matches everything; otherwise the match is a
    /// case-insensitive substring test.
    pub fn matches(&self, text: &str) -> bool {
        if self.search.is_empty() {
            return true;
        }
        text.to_lowercase().contains(&self.search.to_lowercase())
    }
}

impl Default for NoteQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
            search: String::new(),
        }
    }
}
