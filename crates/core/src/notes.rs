//! Note domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note owned by `owner_id` with fresh timestamps.
    pub fn new(owner_id: Uuid, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update to a note.
///
/// Fields are enumerated explicitly; a field that is `None` is left
/// untouched. New updatable fields get a new `Option` here and a new
/// arm in [`NotePatch::apply`], never a stringly-typed setter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    pub text: Option<String>,
}

impl NotePatch {
    /// Returns true when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }

    /// Applies the patch to a note, refreshing `updated_at` only when
    /// at least one field actually changes.
    pub fn apply(&self, note: &mut Note) {
        let mut changed = false;
        if let Some(text) = &self.text {
            if note.text != *text {
                note.text = text.clone();
                changed = true;
            }
        }
        if changed {
            note.updated_at = Utc::now();
        }
    }
}
