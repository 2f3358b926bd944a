//! Cache contract and key scheme.
//!
//! The `Cache` trait is the backend-agnostic key-value contract. Key
//! construction and pattern matching are pure functions so that every
//! backend (and every test) agrees on the exact byte layout of keys.

mod error;
mod keys;
mod patterns;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    all_notes_pattern, extract_user_id_from_key, extract_user_id_from_pattern, is_request_key,
    is_user_notes_key, note_key, request_flush_pattern, request_signature_key, user_notes_key,
    user_notes_pattern, user_notes_tracking_key, ALL_NOTES_KEY, REQUEST_KEY_PREFIX,
    REQUEST_TRACKING_KEY,
};
pub use patterns::pattern_matches;
pub use traits::Cache;
