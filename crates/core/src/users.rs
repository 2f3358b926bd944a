//! User domain types and password helpers.

use chrono::{DateTime, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered user. `password` holds the salted hash, never the
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the default role, hashing the password.
    pub fn new(username: impl Into<String>, plaintext_password: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password: hash_password(plaintext_password),
            role: Role::User,
            created_at: Utc::now(),
        }
    }
}

/// Hashes a password with a random alphanumeric salt.
///
/// Output format is `{salt}${hex(sha256(salt + password))}` so that
/// verification can recover the salt without extra storage.
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("{}${}", salt, digest(&salt, password))
}

/// Verifies a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    digest(salt, password) == hash
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
