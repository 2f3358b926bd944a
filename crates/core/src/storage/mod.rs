//! Storage contracts for notes and users.
//!
//! Backends implement the repository traits; the error taxonomy and its
//! HTTP mapping are pure so that every backend fails the same way at
//! the API surface.

mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{NoteRepository, UserRepository};
pub use types::{NoteQuery, DEFAULT_LIMIT, MAX_LIMIT};
