//! Redis cache implementation.
//!
//! Uses set-based key tracking for efficient pattern deletion without SCAN.
//! Listing keys are tracked in a Redis Set per owner; request-signature
//! keys are tracked in a single shared Set.
//!
//! # Non-Atomicity Safety
//!
//! The operations in this module (especially `delete` and `delete_pattern`) are
//! not atomic - they involve multiple Redis commands. However, this is safe because:
//!
//! - **SREM on non-existent key**: If a key is deleted but the process crashes before
//!   SREM, the tracking set will contain a stale reference. This is harmless because
//!   SREM on a non-existent member is a no-op, and DEL on a non-existent key is also safe.
//!
//! - **Orphaned entries in tracking set**: If keys are added to tracking but the actual
//!   SET fails, the tracking set may reference non-existent keys. This is harmless because
//!   delete_pattern will simply try to delete keys that don't exist.
//!
//! - **Partial deletion**: If delete_pattern deletes some keys but crashes before
//!   completing, subsequent calls will finish the cleanup safely.
//!
//! The worst case is temporary inconsistency, not data corruption or lost writes.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use notehub_core::cache::{
    extract_user_id_from_key, extract_user_id_from_pattern, is_request_key, is_user_notes_key,
    pattern_matches, user_notes_tracking_key, Cache, Result, ALL_NOTES_KEY, REQUEST_TRACKING_KEY,
};

use super::error::map_redis_error;

/// Timeout applied to establishing connections and to individual commands.
const REDIS_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis cache backend using connection manager for pooling.
///
/// Listing and request-signature keys are automatically tracked in Redis
/// Sets to enable efficient pattern-based deletion without using SCAN
/// operations.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
}

impl RedisCache {
    /// Creates a new Redis cache connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let config = redis::aio::ConnectionManagerConfig::new()
            .set_connection_timeout(REDIS_TIMEOUT)
            .set_response_timeout(REDIS_TIMEOUT);
        let conn = redis::aio::ConnectionManager::new_with_config(client, config)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }

    /// Returns the tracking set holding keys relevant to `key`, if any.
    fn tracking_set_for(key: &str) -> Option<String> {
        if is_user_notes_key(key) {
            extract_user_id_from_key(key).map(user_notes_tracking_key)
        } else if is_request_key(key) {
            Some(REQUEST_TRACKING_KEY.to_string())
        } else {
            None
        }
    }

    /// Deletes every tracked member of `tracking_key` matching `pattern`.
    async fn delete_tracked(&self, tracking_key: &str, pattern: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        let tracked_keys: Vec<String> =
            conn.smembers(tracking_key).await.map_err(map_redis_error)?;

        let keys_to_delete: Vec<&String> = tracked_keys
            .iter()
            .filter(|k| pattern_matches(pattern, k))
            .collect();

        if !keys_to_delete.is_empty() {
            conn.del::<_, ()>(&keys_to_delete)
                .await
                .map_err(map_redis_error)?;
            conn.srem::<_, _, ()>(tracking_key, &keys_to_delete)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();

        // Set the value
        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds)
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        // Track listing and request keys in their tracking set
        if let Some(tracking_key) = Self::tracking_set_for(key) {
            conn.sadd::<_, _, ()>(&tracking_key, key)
                .await
                .map_err(map_redis_error)?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        // Note: The following operations are not atomic, but this is safe.
        // See module-level documentation for details on non-atomicity safety.

        if let Some(tracking_key) = Self::tracking_set_for(key) {
            conn.srem::<_, _, ()>(&tracking_key, key)
                .await
                .map_err(map_redis_error)?;
        }

        conn.del::<_, ()>(key).await.map_err(map_redis_error)?;

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        // Listing pattern for a specific owner
        if let Some(user_id) = extract_user_id_from_pattern(pattern) {
            return self
                .delete_tracked(&user_notes_tracking_key(user_id), pattern)
                .await;
        }

        // Request-signature flush
        if pattern.starts_with("req:") {
            return self.delete_tracked(REQUEST_TRACKING_KEY, pattern).await;
        }

        // Unscoped listing key
        if pattern_matches(pattern, ALL_NOTES_KEY) {
            let mut conn = self.conn.clone();
            conn.del::<_, ()>(ALL_NOTES_KEY)
                .await
                .map_err(map_redis_error)?;
            return Ok(());
        }

        // Unknown namespace - nothing tracked, nothing to delete
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(pong == "PONG")
    }
}
