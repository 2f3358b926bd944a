//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use notehub_core::notes::{Note, NotePatch};
use notehub_core::storage::{
    NoteQuery, NoteRepository, RepositoryError, Result, UserRepository,
};
use notehub_core::users::User;

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    notes: Arc<RwLock<HashMap<Uuid, Note>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            notes: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Sorts by creation time, breaking ties by id for stable pagination.
fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn get_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .get(&id)
            .filter(|note| note.owner_id == owner_id)
            .cloned())
    }

    async fn list_notes(&self, owner_id: Uuid, query: &NoteQuery) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut matched: Vec<Note> = notes
            .values()
            .filter(|note| note.owner_id == owner_id)
            .filter(|note| query.matches(&note.text))
            .cloned()
            .collect();
        sort_notes(&mut matched);
        Ok(matched
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn list_all_notes(&self) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut all: Vec<Note> = notes.values().cloned().collect();
        sort_notes(&mut all);
        Ok(all)
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Note",
                id: note.id.to_string(),
            });
        }
        notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn update_note(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &NotePatch,
    ) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&id).filter(|note| note.owner_id == owner_id) {
            Some(note) => {
                patch.apply(note);
                Ok(Some(note.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let owned = notes
            .get(&id)
            .map(|note| note.owner_id == owner_id)
            .unwrap_or(false);
        if !owned {
            return Ok(None);
        }
        Ok(notes.remove(&id))
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.username.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}
