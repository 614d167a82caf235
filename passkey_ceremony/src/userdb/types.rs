use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents an account in the credential store.
///
/// The `id` is the opaque identifier generated when the account is first
/// seen; it doubles as the WebAuthn user handle placed in ceremony options
/// and stored on every credential the account owns. The `name` is the
/// human-readable handle and the lookup key; it is unique within the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier, stable for the account's lifetime
    pub id: String,
    /// Human-readable handle, unique within the store
    pub name: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated unique id
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
