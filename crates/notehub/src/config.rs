use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Single-note cache TTL in seconds (default: 600)
    pub note_cache_ttl_seconds: u64,
    /// Response cache TTL for the request middleware in seconds (default: 300)
    pub middleware_cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path prefixes whose GET responses the middleware may cache.
    pub cache_routes: Vec<String>,
    /// Secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in minutes (default: 30)
    pub access_token_expire_minutes: i64,
    /// Path to SQLite database file (default: "notehub.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Listing cache TTL in seconds (default: 300)
    /// - `NOTE_CACHE_TTL_SECONDS` - Single-note cache TTL (default: 600)
    /// - `MIDDLEWARE_CACHE_TTL_SECONDS` - Response cache TTL (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_ROUTES` - Comma-separated cacheable path prefixes (default: "/notes,/users")
    /// - `JWT_SECRET` - Token signing secret (default: "change-me")
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES` - Token lifetime (default: 30)
    /// - `SQLITE_PATH` - SQLite database path (default: "notehub.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            note_cache_ttl_seconds: env::var("NOTE_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            middleware_cache_ttl_seconds: env::var("MIDDLEWARE_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_routes: env::var("CACHE_ROUTES")
                .map(|v| parse_routes(&v))
                .unwrap_or_else(|_| vec!["/notes".to_string(), "/users".to_string()]),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "change-me".to_string()),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "notehub.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Listing cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Single-note cache TTL as a Duration.
    pub fn note_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.note_cache_ttl_seconds)
    }

    /// Response cache TTL as a Duration.
    pub fn middleware_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.middleware_cache_ttl_seconds)
    }
}

fn parse_routes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
