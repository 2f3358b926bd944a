use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Cache key for the unscoped listing of every note.
pub const ALL_NOTES_KEY: &str = "notes:all";

/// Prefix shared by all request-signature keys.
pub const REQUEST_KEY_PREFIX: &str = "req:";

/// Tracking-set key holding every live request-signature key.
///
/// Lets backends flush `req:*` without scanning the keyspace.
pub const REQUEST_TRACKING_KEY: &str = "req:_keys";

/// Returns the cache key for a single note, scoped to its owner.
pub fn note_key(note_id: Uuid, user_id: Uuid) -> String {
    format!("note:{}:user:{}", note_id, user_id)
}

/// Returns the cache key for one page of a user's note listing.
///
/// Every query parameter participates in the key so that distinct
/// pagination or search parameters never collide.
pub fn user_notes_key(user_id: Uuid, skip: u32, limit: u32, search: &str) -> String {
    format!("user_notes:{}:{}:{}:{}", user_id, skip, limit, search)
}

/// Returns the pattern matching every listing key for a user.
pub fn user_notes_pattern(user_id: Uuid) -> String {
    format!("user_notes:{}:*", user_id)
}

/// Returns the pattern matching the unscoped listing key.
pub fn all_notes_pattern() -> String {
    format!("{}*", ALL_NOTES_KEY)
}

/// Returns the Set key tracking the live listing keys of a user.
///
/// This set contains all listing keys cached for the user (one per
/// skip/limit/search combination) to enable pattern-based deletion
/// without using Redis SCAN.
pub fn user_notes_tracking_key(user_id: Uuid) -> String {
    format!("user_notes:{}:_keys", user_id)
}

/// Returns the pattern matching every request-signature key.
pub fn request_flush_pattern() -> String {
    format!("{}*", REQUEST_KEY_PREFIX)
}

/// Returns the cache key for a whole-response cache entry.
///
/// The signature hashes the method, path, query string, and the
/// Authorization header. The header is always part of the digest so
/// two users issuing the same request never share an entry.
pub fn request_signature_key(method: &str, path: &str, query: &str, authorization: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"|");
    hasher.update(path.as_bytes());
    hasher.update(b"|");
    hasher.update(query.as_bytes());
    hasher.update(b"|");
    hasher.update(authorization.as_bytes());
    format!("{}{}", REQUEST_KEY_PREFIX, hex::encode(hasher.finalize()))
}

/// Extracts the user ID from a listing or tracking key, if present.
///
/// Returns `None` for keys in other namespaces.
///
/// # Examples
///
/// ```
/// use notehub_core::cache::extract_user_id_from_key;
/// use uuid::Uuid;
///
/// let id = Uuid::nil();
/// let key = format!("user_notes:{}:0:10:", id);
/// assert_eq!(extract_user_id_from_key(&key), Some(id));
///
/// assert_eq!(extract_user_id_from_key("notes:all"), None);
/// ```
pub fn extract_user_id_from_key(key: &str) -> Option<Uuid> {
    let rest = key.strip_prefix("user_notes:")?;
    let uuid_part = rest.split(':').next()?;
    Uuid::parse_str(uuid_part).ok()
}

/// Extracts the user ID from a listing pattern, if present.
///
/// Returns `None` for non-listing patterns or patterns with a wildcard
/// in the UUID position.
pub fn extract_user_id_from_pattern(pattern: &str) -> Option<Uuid> {
    let rest = pattern.strip_prefix("user_notes:")?;
    let uuid_part = rest.split(':').next()?;
    // A wildcard in the UUID position means no specific user
    if uuid_part.contains('*') {
        return None;
    }
    Uuid::parse_str(uuid_part).ok()
}

/// Checks if a cache key is a listing key (e.g., `"user_notes:{id}:0:10:"`).
///
/// These keys should be tracked in the owner's tracking set. The
/// tracking set itself (`user_notes:{id}:_keys`) is excluded.
pub fn is_user_notes_key(key: &str) -> bool {
    let Some(rest) = key.strip_prefix("user_notes:") else {
        return false;
    };
    let parts: Vec<&str> = rest.split(':').collect();
    // Must have the UUID plus at least skip/limit/search segments
    if parts.len() < 4 || parts[1] == "_keys" {
        return false;
    }
    Uuid::parse_str(parts[0]).is_ok()
}

/// Checks if a cache key is a request-signature key.
pub fn is_request_key(key: &str) -> bool {
    key.starts_with(REQUEST_KEY_PREFIX) && key != REQUEST_TRACKING_KEY
}
