//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Notes table
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_notes_owner_id ON notes(owner_id);
CREATE INDEX IF NOT EXISTS idx_notes_owner_created ON notes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, username, password, role, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, password, role, created_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, password, role, created_at
FROM users
WHERE username = ?1
"#;

pub const SELECT_ALL_USERS: &str = r#"
SELECT id, username, password, role, created_at
FROM users
ORDER BY created_at ASC, id ASC
"#;

// Note queries
pub const INSERT_NOTE: &str = r#"
INSERT INTO notes (id, owner_id, text, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_NOTE_BY_ID_AND_OWNER: &str = r#"
SELECT id, owner_id, text, created_at, updated_at
FROM notes
WHERE id = ?1 AND owner_id = ?2
"#;

pub const SELECT_NOTES_BY_OWNER: &str = r#"
SELECT id, owner_id, text, created_at, updated_at
FROM notes
WHERE owner_id = ?1 AND text LIKE ?2 ESCAPE '\'
ORDER BY created_at ASC, id ASC
LIMIT ?3 OFFSET ?4
"#;

pub const SELECT_ALL_NOTES: &str = r#"
SELECT id, owner_id, text, created_at, updated_at
FROM notes
ORDER BY created_at ASC, id ASC
"#;

pub const UPDATE_NOTE: &str = r#"
UPDATE notes
SET text = ?3, updated_at = ?4
WHERE id = ?1 AND owner_id = ?2
"#;

pub const DELETE_NOTE: &str = r#"
DELETE FROM notes
WHERE id = ?1 AND owner_id = ?2
"#;

/// Builds a `LIKE` argument matching `search` as a substring.
///
/// `%` and `_` in the user's search are escaped so they match literally.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
