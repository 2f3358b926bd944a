//! The single choke point for all cache access.
//!
//! Every handler and repository decorator talks to the cache through
//! [`CacheManager`], never to a backend directly. The manager owns the
//! default TTL, JSON encoding, and the fail-open policy: any backend or
//! serialization error is logged and absorbed, a failed read becomes a
//! miss and a failed write a no-op. Callers never branch on cache
//! errors.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use notehub_core::cache::Cache;

/// Fail-open wrapper around a cache backend.
///
/// Constructed once at startup and carried in the application state, so
/// tests can inject their own backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn Cache>,
    default_ttl: Duration,
}

impl CacheManager {
    /// Creates a manager over a backend with the given default TTL.
    pub fn new(backend: Arc<dyn Cache>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// Default TTL applied when a caller passes no explicit TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Gets and decodes a JSON value. Any failure is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get_raw(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "cache entry failed to decode, treating as miss");
                None
            }
        }
    }

    /// Gets raw bytes. Any failure is a miss.
    pub async fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        match self.backend.get(key).await {
            Ok(Some(bytes)) => {
                debug!(key, "cache hit");
                Some(bytes)
            }
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache get failed, treating as miss");
                None
            }
        }
    }

    /// Encodes and stores a JSON value. Returns whether the write stuck.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "cache value failed to encode, skipping write");
                return false;
            }
        };
        self.set_raw(key, &bytes, ttl).await
    }

    /// Stores raw bytes. Returns whether the write stuck.
    pub async fn set_raw(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> bool {
        let ttl = ttl.unwrap_or(self.default_ttl);
        match self.backend.set(key, value, Some(ttl)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "cache set failed, skipping write");
                false
            }
        }
    }

    /// Deletes a key. Returns whether the delete stuck.
    pub async fn delete(&self, key: &str) -> bool {
        match self.backend.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "cache delete failed");
                false
            }
        }
    }

    /// Deletes every key matching a pattern. Returns whether it stuck.
    pub async fn delete_pattern(&self, pattern: &str) -> bool {
        match self.backend.delete_pattern(pattern).await {
            Ok(()) => true,
            Err(e) => {
                warn!(pattern, error = %e, "cache pattern delete failed");
                false
            }
        }
    }

    /// Reports whether the backend is reachable.
    pub async fn health_check(&self) -> bool {
        match self.backend.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "cache health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notehub_core::cache::{CacheError, Result};
    use serde::Deserialize;

    /// Backend that fails every operation.
    struct FailingCache;

    #[async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete_pattern(&self, _pattern: &str) -> Result<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn health_check(&self) -> Result<bool> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        n: u32,
    }

    fn memory_manager() -> CacheManager {
        CacheManager::new(
            Arc::new(crate::cache::MemoryCache::new(100)),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn set_then_get_round_trips_json() {
        let manager = memory_manager();
        assert!(manager.set("k", &Payload { n: 7 }, None).await);
        assert_eq!(manager.get::<Payload>("k").await, Some(Payload { n: 7 }));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let manager = memory_manager();
        assert_eq!(manager.get::<Payload>("missing").await, None);
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss() {
        let manager = memory_manager();
        assert!(manager.set_raw("k", b"not json", None).await);
        assert_eq!(manager.get::<Payload>("k").await, None);
    }

    #[tokio::test]
    async fn failing_backend_degrades_to_miss() {
        let manager = CacheManager::new(Arc::new(FailingCache), Duration::from_secs(300));

        assert_eq!(manager.get::<Payload>("k").await, None);
        assert!(!manager.set("k", &Payload { n: 1 }, None).await);
        assert!(!manager.delete("k").await);
        assert!(!manager.delete_pattern("k:*").await);
        assert!(!manager.health_check().await);
    }

    #[tokio::test]
    async fn healthy_backend_reports_healthy() {
        let manager = memory_manager();
        assert!(manager.health_check().await);
    }
}
