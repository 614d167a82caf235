use crate::storage::GENERIC_DATA_STORE;
use crate::userdb::{errors::UserError, types::User};

use super::postgres::*;
use super::sqlite::*;

pub struct UserStore;

impl UserStore {
    /// Initialize the user table
    pub(crate) async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_tables_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            create_tables_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their id (the opaque user handle)
    pub async fn get_user(id: &str) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their unique name
    pub async fn get_user_by_name(name: &str) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_by_name_sqlite(pool, name).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_name_postgres(pool, name).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Return the user named `name`, creating it first when absent.
    ///
    /// Idempotent: repeated calls with the same name yield the same user id.
    /// The lookup and insert run under the store lock, and the unique `name`
    /// column backs the same guarantee at the SQL layer, so two concurrent
    /// calls cannot create two accounts for one name.
    pub async fn get_or_create_user(name: &str) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            if let Some(user) = get_user_by_name_sqlite(pool, name).await? {
                return Ok(user);
            }
            insert_user_if_absent_sqlite(pool, &User::new(name)).await?;
            get_user_by_name_sqlite(pool, name)
                .await?
                .ok_or(UserError::NotFound)
        } else if let Some(pool) = store.as_postgres() {
            if let Some(user) = get_user_by_name_postgres(pool, name).await? {
                return Ok(user);
            }
            insert_user_if_absent_postgres(pool, &User::new(name)).await?;
            get_user_by_name_postgres(pool, name)
                .await?
                .ok_or(UserError::NotFound)
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}
