//! Pure domain logic for the notes service.
//!
//! This crate contains no I/O: the cache contract and key scheme, the
//! repository traits and their error taxonomy, the note and user domain
//! types, and the token helpers. Concrete backends (redis, sqlite, the
//! HTTP surface) live in the `notehub` crate.

pub mod auth;
pub mod cache;
pub mod notes;
pub mod storage;
pub mod users;
