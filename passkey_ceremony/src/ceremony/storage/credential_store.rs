use crate::storage::GENERIC_DATA_STORE;

use crate::ceremony::errors::CeremonyError;
use crate::ceremony::types::{CredentialSearchField, StoredCredential};

use super::postgres::*;
use super::sqlite::*;

/// Credential half of the credential store contract.
///
/// Credential ids are unique across the entire store, not just per user:
/// `store_credential` runs its uniqueness check and insert as one critical
/// section (the store lock is held across both, and the primary key
/// constraint backs the same invariant in SQL), so exactly one of any number
/// of concurrent inserts for the same id can succeed.
pub struct CredentialStore;

impl CredentialStore {
    /// Initialize the credential table
    pub(crate) async fn init() -> Result<(), CeremonyError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_tables_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            create_tables_postgres(pool).await
        } else {
            Err(CeremonyError::Storage("Unsupported database type".into()))
        }
    }

    /// Insert a newly registered credential.
    ///
    /// Fails with [`CeremonyError::DuplicateCredential`] when a credential
    /// with the same id already exists, no matter which user owns it.
    pub async fn store_credential(credential: StoredCredential) -> Result<(), CeremonyError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            store_credential_sqlite(pool, &credential).await
        } else if let Some(pool) = store.as_postgres() {
            store_credential_postgres(pool, &credential).await
        } else {
            Err(CeremonyError::Storage("Unsupported database type".into()))
        }
    }

    pub async fn get_credential(
        credential_id: &str,
    ) -> Result<Option<StoredCredential>, CeremonyError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_credential_sqlite(pool, credential_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_credential_postgres(pool, credential_id).await
        } else {
            Err(CeremonyError::Storage("Unsupported database type".into()))
        }
    }

    pub async fn get_credentials_by(
        field: CredentialSearchField,
    ) -> Result<Vec<StoredCredential>, CeremonyError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_credentials_by_field_sqlite(pool, &field).await
        } else if let Some(pool) = store.as_postgres() {
            get_credentials_by_field_postgres(pool, &field).await
        } else {
            Err(CeremonyError::Storage("Unsupported database type".into()))
        }
    }

    /// Whether no stored credential, under any user, carries this id.
    pub async fn is_credential_id_unique(credential_id: &str) -> Result<bool, CeremonyError> {
        Ok(Self::get_credential(credential_id).await?.is_none())
    }

    /// Overwrite the signature counter with the verifier-reported value.
    ///
    /// Fails with [`CeremonyError::NotFound`] when the credential no longer
    /// exists.
    pub async fn update_credential_counter(
        credential_id: &str,
        counter: u32,
    ) -> Result<(), CeremonyError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            update_credential_counter_sqlite(pool, credential_id, counter).await
        } else if let Some(pool) = store.as_postgres() {
            update_credential_counter_postgres(pool, credential_id, counter).await
        } else {
            Err(CeremonyError::Storage("Unsupported database type".into()))
        }
    }
}
