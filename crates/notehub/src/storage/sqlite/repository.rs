//! SQLite repository implementation.
//!
//! Implements the repository traits from `notehub_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use notehub_core::notes::{Note, NotePatch};
use notehub_core::storage::{
    NoteQuery, NoteRepository, RepositoryError, Result, UserRepository,
};
use notehub_core::users::User;

use super::conversions::{format_datetime, row_to_note, row_to_user};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for notes and users.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl NoteRepository for SqliteRepository {
    async fn get_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let id_str = id.to_string();
        let owner_str = owner_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTE_BY_ID_AND_OWNER)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str, &owner_str], row_to_note) {
                    Ok(note) => Ok(Some(note)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", id.to_string()))
    }

    async fn list_notes(&self, owner_id: Uuid, query: &NoteQuery) -> Result<Vec<Note>> {
        let owner_str = owner_id.to_string();
        let pattern = schema::like_pattern(&query.search);
        let limit = query.limit as i64;
        let offset = query.skip as i64;

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTES_BY_OWNER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![owner_str, pattern, limit, offset],
                        row_to_note,
                    )
                    .map_err(wrap_err)?;

                let mut notes = Vec::new();
                for row_result in rows {
                    notes.push(row_result.map_err(wrap_err)?);
                }
                Ok(notes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn list_all_notes(&self) -> Result<Vec<Note>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_NOTES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_note).map_err(wrap_err)?;

                let mut notes = Vec::new();
                for row_result in rows {
                    notes.push(row_result.map_err(wrap_err)?);
                }
                Ok(notes)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let id = note.id.to_string();
        let owner_id = note.owner_id.to_string();
        let text = note.text.clone();
        let created_at = format_datetime(&note.created_at);
        let updated_at = format_datetime(&note.updated_at);
        let note_id = note.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NOTE,
                    rusqlite::params![id, owner_id, text, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", note_id))
    }

    async fn update_note(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &NotePatch,
    ) -> Result<Option<Note>> {
        let id_str = id.to_string();
        let owner_str = owner_id.to_string();
        let patch = patch.clone();

        // Read, patch, and write in one connection call so the row
        // cannot change between the select and the update.
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTE_BY_ID_AND_OWNER)
                    .map_err(wrap_err)?;
                let mut note = match stmt.query_row([&id_str, &owner_str], row_to_note) {
                    Ok(note) => note,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };

                patch.apply(&mut note);

                conn.execute(
                    schema::UPDATE_NOTE,
                    rusqlite::params![
                        id_str,
                        owner_str,
                        note.text,
                        format_datetime(&note.updated_at)
                    ],
                )
                .map_err(wrap_err)?;

                Ok(Some(note))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", id.to_string()))
    }

    async fn delete_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let id_str = id.to_string();
        let owner_str = owner_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTE_BY_ID_AND_OWNER)
                    .map_err(wrap_err)?;
                let note = match stmt.query_row([&id_str, &owner_str], row_to_note) {
                    Ok(note) => note,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };

                conn.execute(schema::DELETE_NOTE, [&id_str, &owner_str])
                    .map_err(wrap_err)?;

                Ok(Some(note))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", id.to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username_owned = username.to_string();
        let username_for_err = username.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_USERNAME)
                    .map_err(wrap_err)?;
                match stmt.query_row([&username_owned], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", username_for_err))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let username = user.username.clone();
        let password = user.password.clone();
        let role = user.role.to_string();
        let created_at = format_datetime(&user.created_at);
        let username_for_err = user.username.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, username, password, role, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", username_for_err))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_USERS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_user).map_err(wrap_err)?;

                let mut users = Vec::new();
                for row_result in rows {
                    users.push(row_result.map_err(wrap_err)?);
                }
                Ok(users)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo_with_user() -> (SqliteRepository, User) {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user = User::new("alice", "pw");
        repo.create_user(&user).await.unwrap();
        (repo, user)
    }

    #[tokio::test]
    async fn test_note_create_and_get() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "buy milk");

        repo.create_note(&note).await.unwrap();

        let retrieved = repo.get_note(note.id, user.id).await.unwrap();
        assert_eq!(retrieved, Some(note));
    }

    #[tokio::test]
    async fn test_note_get_wrong_owner_behaves_as_missing() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "private");
        repo.create_note(&note).await.unwrap();

        let other = User::new("bob", "pw");
        repo.create_user(&other).await.unwrap();

        let result = repo.get_note(note.id, other.id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_note_update_patches_text() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "original");
        repo.create_note(&note).await.unwrap();

        let patch = NotePatch {
            text: Some("updated".to_string()),
        };
        let updated = repo
            .update_note(note.id, user.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "updated");

        let retrieved = repo.get_note(note.id, user.id).await.unwrap().unwrap();
        assert_eq!(retrieved.text, "updated");
    }

    #[tokio::test]
    async fn test_note_update_missing_returns_none() {
        let (repo, user) = repo_with_user().await;
        let patch = NotePatch {
            text: Some("nope".to_string()),
        };
        let result = repo
            .update_note(Uuid::new_v4(), user.id, &patch)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_note_delete_returns_note() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "gone soon");
        repo.create_note(&note).await.unwrap();

        let deleted = repo.delete_note(note.id, user.id).await.unwrap();
        assert_eq!(deleted.map(|n| n.id), Some(note.id));

        assert!(repo.get_note(note.id, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_notes_search_and_pagination() {
        let (repo, user) = repo_with_user().await;

        repo.create_note(&Note::new(user.id, "Learn Rust"))
            .await
            .unwrap();
        repo.create_note(&Note::new(user.id, "learn sqlite"))
            .await
            .unwrap();
        repo.create_note(&Note::new(user.id, "buy groceries"))
            .await
            .unwrap();

        let found = repo
            .list_notes(user.id, &NoteQuery::new(0, 10, "learn"))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let page = repo
            .list_notes(user.id, &NoteQuery::new(1, 1, "learn"))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_list_notes_escapes_like_wildcards() {
        let (repo, user) = repo_with_user().await;

        repo.create_note(&Note::new(user.id, "discount 50%"))
            .await
            .unwrap();
        repo.create_note(&Note::new(user.id, "discount 50 dollars"))
            .await
            .unwrap();

        let found = repo
            .list_notes(user.id, &NoteQuery::new(0, 10, "50%"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "discount 50%");
    }

    #[tokio::test]
    async fn test_list_all_notes() {
        let (repo, user) = repo_with_user().await;
        let other = User::new("bob", "pw");
        repo.create_user(&other).await.unwrap();

        repo.create_note(&Note::new(user.id, "a")).await.unwrap();
        repo.create_note(&Note::new(other.id, "b")).await.unwrap();

        let all = repo.list_all_notes().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_user_duplicate_username_rejected() {
        let (repo, _user) = repo_with_user().await;

        let result = repo.create_user(&User::new("alice", "other")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_user_get_by_username() {
        let (repo, user) = repo_with_user().await;

        let retrieved = repo.get_user_by_username("alice").await.unwrap();
        assert_eq!(retrieved, Some(user));

        assert!(repo.get_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_users() {
        let (repo, _user) = repo_with_user().await;
        repo.create_user(&User::new("bob", "pw")).await.unwrap();

        let users = repo.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
    }
}
