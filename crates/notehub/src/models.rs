//! Request and response payloads for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notehub_core::notes::NotePatch;
use notehub_core::storage::{NoteQuery, DEFAULT_LIMIT};
use notehub_core::users::User;

/// Request payload for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
}

/// Request payload for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// Request payload for creating a note.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub text: String,
}

/// Request payload for updating a note.
#[derive(Debug, Deserialize)]
pub struct UpdateNote {
    pub text: Option<String>,
}

impl UpdateNote {
    pub fn into_patch(self) -> NotePatch {
        NotePatch { text: self.text }
    }
}

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub search: String,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl ListNotesParams {
    pub fn into_query(self) -> NoteQuery {
        NoteQuery::new(self.skip, self.limit, &self.search)
    }
}

/// Request payload for the send-email job.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Request payload for the process-data job.
#[derive(Debug, Deserialize)]
pub struct ProcessDataRequest {
    pub data: String,
}

/// Response for a submitted background job.
#[derive(Debug, Serialize)]
pub struct JobSubmitted {
    pub task_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params: ListNotesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.search, "");
    }

    #[test]
    fn test_user_response_omits_password() {
        let user = User::new("alice", "hunter2");
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
    }
}
