use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::CeremonyError;
use crate::storage::CacheData;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct PublicKeyCredentialUserEntity {
    pub user_handle: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Reference to a single credential, as carried in exclusion and allow
/// lists.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CredentialDescriptor {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
}

/// Stored credential information for a registered passkey.
///
/// This is everything the core needs to verify subsequent authentications
/// with the same credential: the public key, the credential id, the
/// authenticator's signature counter and the owning user's handle.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StoredCredential {
    /// Credential id assigned by the authenticator, base64url encoded;
    /// globally unique across all users
    pub credential_id: String,
    /// Id of the owning user; used only for lookup, never for lifecycle
    pub user_id: String,
    /// Public key material, base64url encoded; immutable once stored
    pub public_key: String,
    /// Authenticator signature counter; non-decreasing under correct
    /// operation
    pub counter: u32,
    /// Snapshot of the owning user entity
    pub user: PublicKeyCredentialUserEntity,
    /// When the credential was registered
    pub created_at: DateTime<Utc>,
    /// When the credential was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredCredential> for CredentialDescriptor {
    fn from(credential: &StoredCredential) -> Self {
        Self {
            type_: "public-key".to_string(),
            id: credential.credential_id.clone(),
        }
    }
}

/// Pending challenge payload, stored at the begin step and consumed at the
/// finish step.
///
/// The whole payload round-trips unmodified to the verifier so it can check
/// the response against the challenge and policy that were actually issued.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StoredOptions {
    /// Server-generated challenge nonce, base64url encoded
    pub challenge: String,
    /// User entity the options were issued for; absent for authentication
    pub user: Option<PublicKeyCredentialUserEntity>,
    /// User verification requirement the options were issued with
    pub user_verification: String,
    /// Exclusion list (registration) or allow list (authentication)
    pub credentials: Vec<CredentialDescriptor>,
    /// Creation time, unix seconds
    pub timestamp: u64,
    /// Validity window in seconds
    pub ttl: u64,
}

/// Search field options for credential lookup.
#[derive(Debug)]
pub enum CredentialSearchField {
    /// Search by credential id
    CredentialId(String),
    /// Search by the owning user's id
    UserId(String),
    /// Search by the owning user's name
    UserName(String),
}

impl From<StoredOptions> for CacheData {
    fn from(data: StoredOptions) -> Self {
        Self {
            // StoredOptions contains only JSON-representable fields
            value: serde_json::to_string(&data).expect("Failed to serialize StoredOptions"),
            expires_at: Utc::now() + chrono::Duration::seconds(data.ttl as i64),
        }
    }
}

impl TryFrom<CacheData> for StoredOptions {
    type Error = CeremonyError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| CeremonyError::Storage(e.to_string()))
    }
}
