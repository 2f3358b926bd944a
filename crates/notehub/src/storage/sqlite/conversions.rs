//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use notehub_core::notes::Note;
use notehub_core::users::{Role, User};

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, password, role, created_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let password: String = row.get(2)?;
    let role: String = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(User {
        id: parse_uuid(&id)?,
        username,
        password,
        role: parse_role(&role)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Convert a SQLite row to a Note.
///
/// Expected columns: id, owner_id, text, created_at, updated_at
pub fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    let id: String = row.get(0)?;
    let owner_id: String = row.get(1)?;
    let text: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(Note {
        id: parse_uuid(&id)?,
        owner_id: parse_uuid(&owner_id)?,
        text,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a Role from string.
fn parse_role(s: &str) -> rusqlite::Result<Role> {
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
