//! Cached note repository decorator.
//!
//! Wraps a `NoteRepository` with read-through caching. Reads check the
//! cache first and populate it on a miss. Writes go to storage first and
//! invalidate only after the write succeeds, so a failed write never
//! evicts still-valid entries. Missing notes are never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use notehub_core::cache::{
    all_notes_pattern, note_key, user_notes_key, user_notes_pattern, ALL_NOTES_KEY,
};
use notehub_core::notes::{Note, NotePatch};
use notehub_core::storage::{NoteQuery, NoteRepository, Result};

use crate::cache::CacheManager;

/// Read-through, write-invalidate decorator over a note repository.
///
/// Single notes and listings carry separate TTLs because listings go
/// stale faster and are cheaper to rebuild.
pub struct CachedNoteRepository<R>
where
    R: NoteRepository,
{
    repository: Arc<R>,
    cache: CacheManager,
    note_ttl: Duration,
    list_ttl: Duration,
}

impl<R> CachedNoteRepository<R>
where
    R: NoteRepository,
{
    /// Creates a new cached note repository.
    pub fn new(
        repository: Arc<R>,
        cache: CacheManager,
        note_ttl: Duration,
        list_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            note_ttl,
            list_ttl,
        }
    }

    /// Drops every listing the owner could observe stale data through.
    async fn invalidate_listings(&self, owner_id: Uuid) {
        self.cache.delete_pattern(&user_notes_pattern(owner_id)).await;
        self.cache.delete_pattern(&all_notes_pattern()).await;
    }
}

#[async_trait]
impl<R> NoteRepository for CachedNoteRepository<R>
where
    R: NoteRepository + 'static,
{
    async fn get_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let cache_key = note_key(id, owner_id);

        if let Some(note) = self.cache.get::<Note>(&cache_key).await {
            tracing::trace!(note_id = %id, "Cache hit for note");
            return Ok(Some(note));
        }

        tracing::trace!(note_id = %id, "Cache miss for note");
        let note = self.repository.get_note(id, owner_id).await?;

        if let Some(ref n) = note {
            self.cache.set(&cache_key, n, Some(self.note_ttl)).await;
        }

        Ok(note)
    }

    async fn list_notes(&self, owner_id: Uuid, query: &NoteQuery) -> Result<Vec<Note>> {
        let cache_key = user_notes_key(owner_id, query.skip, query.limit, &query.search);

        if let Some(notes) = self.cache.get::<Vec<Note>>(&cache_key).await {
            tracing::trace!(owner_id = %owner_id, "Cache hit for note listing");
            return Ok(notes);
        }

        tracing::trace!(owner_id = %owner_id, "Cache miss for note listing");
        let notes = self.repository.list_notes(owner_id, query).await?;

        self.cache.set(&cache_key, &notes, Some(self.list_ttl)).await;

        Ok(notes)
    }

    async fn list_all_notes(&self) -> Result<Vec<Note>> {
        if let Some(notes) = self.cache.get::<Vec<Note>>(ALL_NOTES_KEY).await {
            tracing::trace!("Cache hit for global note listing");
            return Ok(notes);
        }

        tracing::trace!("Cache miss for global note listing");
        let notes = self.repository.list_all_notes().await?;

        self.cache.set(ALL_NOTES_KEY, &notes, Some(self.list_ttl)).await;

        Ok(notes)
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        self.repository.create_note(note).await?;

        // A new note changes listings but no single-note entry exists yet.
        self.invalidate_listings(note.owner_id).await;

        tracing::debug!(note_id = %note.id, owner_id = %note.owner_id, "Note created");
        Ok(())
    }

    async fn update_note(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &NotePatch,
    ) -> Result<Option<Note>> {
        let updated = self.repository.update_note(id, owner_id, patch).await?;

        if updated.is_some() {
            self.cache.delete(&note_key(id, owner_id)).await;
            self.invalidate_listings(owner_id).await;
            tracing::debug!(note_id = %id, owner_id = %owner_id, "Note updated");
        }

        Ok(updated)
    }

    async fn delete_note(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Note>> {
        let deleted = self.repository.delete_note(id, owner_id).await?;

        if deleted.is_some() {
            self.cache.delete(&note_key(id, owner_id)).await;
            self.invalidate_listings(owner_id).await;
            tracing::debug!(note_id = %id, owner_id = %owner_id, "Note deleted");
        }

        Ok(deleted)
    }
}
