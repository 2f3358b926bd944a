//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `notehub_core::storage`, plus the cached decorator that
//! layers the read-through/write-invalidate policy over any backend.
//! Backends are selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMap-based storage, data lost on restart
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory backend (default):
//! ```bash
//! cargo build -p notehub
//! ```
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p notehub --no-default-features --features sqlite,memory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p notehub --features inmemory"
);

pub mod cached;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::CachedNoteRepository;

// Re-export the active repository implementation for convenience
#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
