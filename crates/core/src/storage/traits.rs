use async_trait::async_trait;
use uuid::Uuid;

use crate::notes::{Note, NotePatch};
use crate::users::User;

use super::{NoteQuery, Result};

/// Repository for note operations.
///
/// All single-note operations are scoped by owner: a note that exists
/// but belongs to someone else behaves exactly like a note that does
/// not exist.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Gets a note by its ID, scoped to its owner.
    async fn get_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>>;

    /// Lists a user's notes, applying pagination and the search filter.
    ///
    /// Results are ordered by creation time, oldest first, so that
    /// pagination is stable across calls.
    async fn list_notes(&self, owner_id: Uuid, query: &NoteQuery) -> Result<Vec<Note>>;

    /// Lists every note regardless of owner.
    async fn list_all_notes(&self) -> Result<Vec<Note>>;

    /// Creates a new note.
    async fn create_note(&self, note: &Note) -> Result<()>;

    /// Applies a patch to a note, returning the updated note.
    ///
    /// Returns `Ok(None)` when the note does not exist for this owner.
    async fn update_note(&self, id: Uuid, owner_id: Uuid, patch: &NotePatch)
        -> Result<Option<Note>>;

    /// Deletes a note, returning it if it existed for this owner.
    async fn delete_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Creates a new user.
    ///
    /// Fails with `AlreadyExists` when the username is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Lists all users.
    async fn list_users(&self) -> Result<Vec<User>>;
}
