//! Application state with repository-based storage.
//!
//! This module defines the shared state passed to all request handlers.
//! Handlers see repository trait objects and the cache manager, never a
//! concrete backend. Which backends sit behind the traits is decided by
//! feature flags at startup, or by the caller via [`AppState::from_parts`].

use std::sync::Arc;

use notehub_core::storage::{NoteRepository, UserRepository};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::jobs::JobQueue;

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Note repository (cached, wraps underlying storage).
    pub note_repo: Arc<dyn NoteRepository>,
    /// User repository (uncached, user records change rarely).
    pub user_repo: Arc<dyn UserRepository>,
    /// Fail-open cache handle used by the response middleware.
    pub cache: CacheManager,
    /// Background job queue.
    pub jobs: JobQueue,
    /// Runtime configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Assembles state from already-constructed parts.
    ///
    /// Feature-gated constructors call this, and tests use it to inject
    /// mock repositories or a failing cache backend.
    pub fn from_parts(
        note_repo: Arc<dyn NoteRepository>,
        user_repo: Arc<dyn UserRepository>,
        cache: CacheManager,
        config: Config,
    ) -> Self {
        Self {
            note_repo,
            user_repo,
            cache,
            jobs: JobQueue::new(),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::cached::CachedNoteRepository;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for development and tests without external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = CacheManager::new(
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                config.middleware_cache_ttl(),
            );

            let cached_note_repo = Arc::new(CachedNoteRepository::new(
                repo.clone(),
                cache.clone(),
                config.note_cache_ttl(),
                config.cache_ttl(),
            ));

            Ok(Self::from_parts(
                cached_note_repo,
                repo,
                cache,
                config.clone(),
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::cached::CachedNoteRepository;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = CacheManager::new(
                Arc::new(RedisCache::new(&config.redis_url).await?),
                config.middleware_cache_ttl(),
            );

            let cached_note_repo = Arc::new(CachedNoteRepository::new(
                repo.clone(),
                cache.clone(),
                config.note_cache_ttl(),
                config.cache_ttl(),
            ));

            Ok(Self::from_parts(
                cached_note_repo,
                repo,
                cache,
                config.clone(),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::cached::CachedNoteRepository;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = CacheManager::new(
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                config.middleware_cache_ttl(),
            );

            let cached_note_repo = Arc::new(CachedNoteRepository::new(
                repo.clone(),
                cache.clone(),
                config.note_cache_ttl(),
                config.cache_ttl(),
            ));

            Ok(Self::from_parts(
                cached_note_repo,
                repo,
                cache,
                config.clone(),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::cached::CachedNoteRepository;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = CacheManager::new(
                Arc::new(RedisCache::new(&config.redis_url).await?),
                config.middleware_cache_ttl(),
            );

            let cached_note_repo = Arc::new(CachedNoteRepository::new(
                repo.clone(),
                cache.clone(),
                config.note_cache_ttl(),
                config.cache_ttl(),
            ));

            Ok(Self::from_parts(
                cached_note_repo,
                repo,
                cache,
                config.clone(),
            ))
        }
    }
}
