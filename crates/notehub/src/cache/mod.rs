//! Cache backend implementations.
//!
//! This module provides concrete implementations of the cache trait
//! defined in `notehub_core::cache`, plus the [`CacheManager`] that all
//! request handling goes through. Backends are selected at compile time
//! via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): In-memory cache using tokio synchronization primitives
//! - `redis`: Redis cache using the redis crate
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p notehub --features memory"
);

mod manager;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use manager::CacheManager;

// Re-export the active cache implementation
#[cfg(feature = "memory")]
pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
