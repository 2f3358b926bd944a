//! Pure pattern matching for cache keys.
//!
//! Patterns use a glob-style `*` wildcard that matches any sequence of
//! characters, mirroring the subset of Redis glob syntax the key scheme
//! relies on.

/// Checks if a cache key matches a glob pattern.
///
/// `*` matches any sequence of characters, including the empty one.
///
/// # Examples
///
/// ```
/// use notehub_core::cache::pattern_matches;
///
/// // Exact match
/// assert!(pattern_matches("notes:all", "notes:all"));
///
/// // Wildcard at end
/// assert!(pattern_matches("user_notes:123:*", "user_notes:123:0:10:rust"));
///
/// // No match across namespaces
/// assert!(!pattern_matches("user_notes:123:*", "note:456:user:123"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let p = pattern.as_bytes();
    let k = key.as_bytes();

    let mut pi = 0;
    let mut ki = 0;
    // Last `*` seen and the key position it has consumed up to, for
    // backtracking when a literal run fails further on.
    let mut star: Option<(usize, usize)> = None;

    while ki < k.len() {
        if pi < p.len() && p[pi] == b'*' {
            star = Some((pi, ki));
            pi += 1;
        } else if pi < p.len() && p[pi] == k[ki] {
            pi += 1;
            ki += 1;
        } else if let Some((star_pi, star_ki)) = star {
            // Let the wildcard swallow one more byte and retry
            pi = star_pi + 1;
            ki = star_ki + 1;
            star = Some((star_pi, star_ki + 1));
        } else {
            return false;
        }
    }

    // Only trailing wildcards may remain
    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(pattern_matches("notes:all", "notes:all"));
        assert!(pattern_matches("req:deadbeef", "req:deadbeef"));
        assert!(!pattern_matches("notes:all", "notes:mine"));
    }

    #[test]
    fn test_wildcard_at_end() {
        assert!(pattern_matches(
            "user_notes:123:*",
            "user_notes:123:0:10:rust"
        ));
        assert!(pattern_matches("user_notes:123:*", "user_notes:123:"));
        assert!(pattern_matches("req:*", "req:anything-goes-here"));
        assert!(!pattern_matches("user_notes:123:*", "user_notes:456:0:10:"));
    }

    #[test]
    fn test_wildcard_at_start() {
        assert!(pattern_matches("*:user:abc", "note:123:user:abc"));
        assert!(!pattern_matches("*:user:abc", "note:123:user:def"));
    }

    #[test]
    fn test_wildcard_in_middle() {
        assert!(pattern_matches("note:*:user:abc", "note:123:user:abc"));
        assert!(!pattern_matches("note:*:user:abc", "note:123:owner:abc"));
        assert!(!pattern_matches("note:*:user:abc", "user_notes:123:user:abc"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(pattern_matches("note:*:user:*", "note:123:user:abc"));
        assert!(pattern_matches("*:*:*", "a:b:c"));
        assert!(pattern_matches("*:middle:*", "start:middle:end"));
        assert!(!pattern_matches("*:middle:*", "start:other:end"));
    }

    #[test]
    fn test_wildcard_only() {
        assert!(pattern_matches("*", "anything"));
        assert!(pattern_matches("*", ""));
    }

    #[test]
    fn test_empty_pattern_and_key() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "non-empty"));
        assert!(!pattern_matches("non-empty", ""));
        assert!(!pattern_matches("prefix*x", ""));
    }

    #[test]
    fn test_adjacent_wildcards() {
        assert!(pattern_matches("user_notes:**:0", "user_notes:123:0"));
        assert!(pattern_matches("**", "anything"));
        assert!(pattern_matches("prefix:**:suffix", "prefix:a:b:c:suffix"));
    }

    #[test]
    fn test_backtracking() {
        // The first candidate position for "ab" is wrong; the matcher
        // must retry at a later offset.
        assert!(pattern_matches("*ab", "aab"));
        assert!(pattern_matches("*:10:", "user_notes:x:10:10:"));
        assert!(!pattern_matches("*ab", "aba"));
    }

    #[test]
    fn test_real_cache_keys() {
        let user_id = "00000000-0000-0000-0000-000000000000";

        let pattern = format!("user_notes:{}:*", user_id);
        let key = format!("user_notes:{}:0:10:rust", user_id);
        assert!(pattern_matches(&pattern, &key));

        // Different user is untouched
        let other = "user_notes:11111111-1111-1111-1111-111111111111:0:10:";
        assert!(!pattern_matches(&pattern, other));

        // Single-note keys never match listing patterns
        let note = format!("note:{}:user:{}", user_id, user_id);
        assert!(!pattern_matches(&pattern, &note));

        // notes:all* covers the unscoped listing key
        assert!(pattern_matches("notes:all*", "notes:all"));
        assert!(!pattern_matches("notes:all*", &key));
    }
}
