use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A registered account. Only the password digest is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password: &str) -> Self {
        Self {
            username,
            password_hash: hash_password(password),
            created_at: Utc::now(),
        }
    }
}

/// SHA-256 of the password as 64 lowercase hex characters.
///
/// Unsalted: the same password always yields the same digest, for every user.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a plaintext password against a stored digest.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    password_hash == hash_password(password)
}

/// Proof of a successful login. Only the application service hands these
/// out, so holding one means the credentials were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: String) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
