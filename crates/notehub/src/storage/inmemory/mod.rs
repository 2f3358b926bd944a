//! In-memory storage backend implementation.
//!
//! HashMap-based storage for development and testing. Data is not
//! persisted across restarts.

mod repository;

pub use repository::InMemoryRepository;
