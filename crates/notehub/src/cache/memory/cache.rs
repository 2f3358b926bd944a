//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using
//! tokio synchronization primitives and LRU eviction policy.
//!
//! This implementation mirrors the Redis cache behavior for consistency:
//! - Listing keys are tracked per owner for efficient pattern deletion
//! - Deleting a listing key removes it from tracking
//! - Other patterns fall back to full iteration over the store

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use uuid::Uuid;

use notehub_core::cache::{
    extract_user_id_from_key, extract_user_id_from_pattern, is_user_notes_key, pattern_matches,
    Cache, Result,
};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Supports TTL with lazy expiration (entries are cleaned up on access).
/// Uses LRU eviction to limit memory usage when max_entries is reached.
///
/// Listing keys are tracked per owner to enable pattern deletion
/// without iterating the whole store on every invalidation.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    /// Main key-value store with LRU eviction.
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    /// Tracks listing keys by owner for efficient cleanup.
    /// Maps user_id -> Set of cache keys.
    tracking: Arc<RwLock<HashMap<Uuid, HashSet<String>>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Arguments
    ///
    /// * `max_entries` - Maximum number of entries before LRU eviction kicks in.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            tracking: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                // Entry exists but is expired - return None
                // Note: We do lazy cleanup, so we don't remove it here.
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        // Store the value
        {
            let mut store = self.store.write().await;
            let entry = CacheEntry::new(value.to_vec(), ttl);
            store.put(key.to_string(), entry);
        }

        // Track listing keys for efficient cleanup
        if is_user_notes_key(key) {
            if let Some(user_id) = extract_user_id_from_key(key) {
                let mut tracking = self.tracking.write().await;
                tracking.entry(user_id).or_default().insert(key.to_string());
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        // Deleting a listing key removes it from tracking
        if is_user_notes_key(key) {
            if let Some(user_id) = extract_user_id_from_key(key) {
                let mut tracking = self.tracking.write().await;
                if let Some(keys) = tracking.get_mut(&user_id) {
                    keys.remove(key);
                    // Clean up empty tracking sets
                    if keys.is_empty() {
                        tracking.remove(&user_id);
                    }
                }
            }
        }

        let mut store = self.store.write().await;
        store.pop(key);

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // Extract the owner from the pattern for efficient lookup
        let Some(user_id) = extract_user_id_from_pattern(pattern) else {
            // Non-listing pattern (notes:all*, req:*) - full iteration
            let mut store = self.store.write().await;
            let keys_to_delete: Vec<String> = store
                .iter()
                .filter(|(key, _)| pattern_matches(pattern, key))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_delete {
                store.pop(&key);
            }
            return Ok(());
        };

        // Get tracked keys for this owner
        let tracked_keys: Vec<String> = {
            let tracking = self.tracking.read().await;
            tracking
                .get(&user_id)
                .map(|keys| keys.iter().cloned().collect())
                .unwrap_or_default()
        };

        // Filter keys that match the pattern
        let keys_to_delete: Vec<String> = tracked_keys
            .into_iter()
            .filter(|k| pattern_matches(pattern, k))
            .collect();

        if !keys_to_delete.is_empty() {
            // Delete matching keys from store
            {
                let mut store = self.store.write().await;
                for key in &keys_to_delete {
                    store.pop(key);
                }
            }

            // Remove from tracking
            {
                let mut tracking = self.tracking.write().await;
                if let Some(keys) = tracking.get_mut(&user_id) {
                    for key in &keys_to_delete {
                        keys.remove(key);
                    }
                    // Clean up empty tracking sets
                    if keys.is_empty() {
                        tracking.remove(&user_id);
                    }
                }
            }
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::cache::{
        all_notes_pattern, note_key, request_signature_key, user_notes_key, user_notes_pattern,
        ALL_NOTES_KEY,
    };
    use std::time::Duration;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "test:key";
        let value = b"test value";

        cache.set(key, value, None).await.unwrap();
        let result = cache.get(key).await.unwrap();

        assert_eq!(result, Some(value.to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let result = cache.get("nonexistent:key").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "test:delete";

        cache.set(key, b"to be deleted", None).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_some());

        cache.delete(key).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.delete("never:set").await.unwrap();
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "test:ttl";

        cache
            .set(key, b"short-lived", Some(Duration::from_millis(50)))
            .await
            .unwrap();

        // Should exist immediately
        assert!(cache.get(key).await.unwrap().is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Should be expired now
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_pattern_scoped_to_owner() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        let user_id = Uuid::new_v4();
        let key1 = user_notes_key(user_id, 0, 10, "");
        let key2 = user_notes_key(user_id, 10, 10, "rust");

        // Another user's listings
        let other_user_id = Uuid::new_v4();
        let key3 = user_notes_key(other_user_id, 0, 10, "");

        cache.set(&key1, b"1", None).await.unwrap();
        cache.set(&key2, b"2", None).await.unwrap();
        cache.set(&key3, b"3", None).await.unwrap();
        cache.set(ALL_NOTES_KEY, b"4", None).await.unwrap();

        cache
            .delete_pattern(&user_notes_pattern(user_id))
            .await
            .unwrap();

        // First user's listings should be gone
        assert!(cache.get(&key1).await.unwrap().is_none());
        assert!(cache.get(&key2).await.unwrap().is_none());

        // Other entries should remain
        assert!(cache.get(&key3).await.unwrap().is_some());
        assert!(cache.get(ALL_NOTES_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_pattern_no_matches() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        cache.set("user:123", b"value", None).await.unwrap();
        cache.set("user:456", b"value", None).await.unwrap();

        // Pattern for an owner with nothing cached
        cache
            .delete_pattern(&user_notes_pattern(Uuid::new_v4()))
            .await
            .unwrap();

        // All entries should still exist
        assert!(cache.get("user:123").await.unwrap().is_some());
        assert!(cache.get("user:456").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_listing_removes_from_tracking() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        let user_id = Uuid::new_v4();
        let key = user_notes_key(user_id, 0, 10, "");

        cache.set(&key, b"listing", None).await.unwrap();

        // Verify it's tracked
        {
            let tracking = cache.tracking.read().await;
            assert!(tracking.get(&user_id).unwrap().contains(&key));
        }

        cache.delete(&key).await.unwrap();

        // Verify it's removed from tracking (set cleaned up since empty)
        {
            let tracking = cache.tracking.read().await;
            assert!(tracking.get(&user_id).is_none());
        }
    }

    #[tokio::test]
    async fn test_delete_pattern_all_notes() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        let user_id = Uuid::new_v4();
        cache.set(ALL_NOTES_KEY, b"listing", None).await.unwrap();
        cache
            .set(&note_key(Uuid::new_v4(), user_id), b"note", None)
            .await
            .unwrap();

        cache.delete_pattern(&all_notes_pattern()).await.unwrap();

        assert!(cache.get(ALL_NOTES_KEY).await.unwrap().is_none());
        // Single-note keys are untouched
        let remaining: Vec<String> = {
            let store = cache.store.read().await;
            store.iter().map(|(k, _)| k.clone()).collect()
        };
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_pattern_request_keys() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);

        let req1 = request_signature_key("GET", "/notes", "", "Bearer a");
        let req2 = request_signature_key("GET", "/notes", "skip=10", "Bearer a");

        cache.set(&req1, b"resp1", None).await.unwrap();
        cache.set(&req2, b"resp2", None).await.unwrap();
        cache.set(ALL_NOTES_KEY, b"listing", None).await.unwrap();

        cache.delete_pattern("req:*").await.unwrap();

        assert!(cache.get(&req1).await.unwrap().is_none());
        assert!(cache.get(&req2).await.unwrap().is_none());
        assert!(cache.get(ALL_NOTES_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_value() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "test:overwrite";

        cache.set(key, b"first", None).await.unwrap();
        cache.set(key, b"second", None).await.unwrap();

        let result = cache.get(key).await.unwrap();
        assert_eq!(result, Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_no_ttl_never_expires() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let key = "test:no-ttl";

        cache.set(key, b"persistent", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.get(key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        // Create a cache with only 3 entries max
        let cache = MemoryCache::new(3);

        cache.set("key1", b"value1", None).await.unwrap();
        cache.set("key2", b"value2", None).await.unwrap();
        cache.set("key3", b"value3", None).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_some());
        assert!(cache.get("key3").await.unwrap().is_some());

        // Access key1 to make it recently used
        cache.get("key1").await.unwrap();

        // Insert a 4th entry - should evict key2 (least recently used)
        cache.set("key4", b"value4", None).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_none());
        assert!(cache.get("key3").await.unwrap().is_some());
        assert!(cache.get("key4").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_health_check() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        assert!(cache.health_check().await.unwrap());
    }

    #[tokio::test]
    #[should_panic(expected = "max_entries must be > 0")]
    async fn test_zero_max_entries_panics() {
        let _ = MemoryCache::new(0);
    }
}
