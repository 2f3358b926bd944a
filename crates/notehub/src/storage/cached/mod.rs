//! Cached repository decorators.
//!
//! Decorators that wrap the repository traits with read-through caching
//! and write-path invalidation. Handlers depend only on the traits, so
//! caching stays a composition decision made at startup.

mod notes;

pub use notes::CachedNoteRepository;
