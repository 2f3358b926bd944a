use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Implementations report failures through `CacheError`; deciding what a
/// failure means for a request (always: degrade to a miss) is the
/// manager's job, not the backend's.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    ///
    /// Deleting a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all values matching a pattern (e.g., "user_notes:*").
    ///
    /// Succeeds when the pattern matches nothing.
    async fn delete_pattern(&self, pattern: &str) -> Result<()>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> Result<bool>;
}
