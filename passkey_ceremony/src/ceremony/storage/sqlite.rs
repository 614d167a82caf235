use sqlx::{Pool, Row, Sqlite};

use crate::storage::DB_TABLE_CREDENTIALS;

use crate::ceremony::errors::CeremonyError;
use crate::ceremony::types::{
    CredentialSearchField, PublicKeyCredentialUserEntity, StoredCredential,
};

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for StoredCredential {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        let counter: i64 = row.try_get("counter")?;
        Ok(Self {
            credential_id: row.try_get("credential_id")?,
            user_id: row.try_get("user_id")?,
            public_key: row.try_get("public_key")?,
            counter: counter as u32,
            user: PublicKeyCredentialUserEntity {
                user_handle: row.try_get("user_handle")?,
                name: row.try_get("user_name")?,
                display_name: row.try_get("user_display_name")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), CeremonyError> {
    let credentials_table = DB_TABLE_CREDENTIALS.as_str();

    // user_id is a non-owning back-reference used only for lookup, so it
    // carries no foreign key constraint
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            credential_id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            public_key TEXT NOT NULL,
            counter INTEGER NOT NULL DEFAULT 0,
            user_handle TEXT NOT NULL,
            user_name TEXT NOT NULL,
            user_display_name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        credentials_table
    ))
    .execute(pool)
    .await
    .map_err(|e| CeremonyError::Storage(e.to_string()))?;

    sqlx::query(&format!(
        r#"CREATE INDEX IF NOT EXISTS idx_{}_user_id ON {}(user_id)"#,
        credentials_table, credentials_table
    ))
    .execute(pool)
    .await
    .map_err(|e| CeremonyError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn store_credential_sqlite(
    pool: &Pool<Sqlite>,
    credential: &StoredCredential,
) -> Result<(), CeremonyError> {
    let credentials_table = DB_TABLE_CREDENTIALS.as_str();

    // Check-then-insert runs under the caller's store lock; the primary key
    // constraint is mapped below in case another writer bypasses the lock.
    if get_credential_sqlite(pool, &credential.credential_id)
        .await?
        .is_some()
    {
        return Err(CeremonyError::DuplicateCredential(format!(
            "Credential id {} already registered",
            credential.credential_id
        )));
    }

    let counter_i64 = credential.counter as i64;

    sqlx::query(&format!(
        r#"
        INSERT INTO {}
        (credential_id, user_id, public_key, counter, user_handle, user_name, user_display_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        credentials_table
    ))
    .bind(&credential.credential_id)
    .bind(&credential.user_id)
    .bind(&credential.public_key)
    .bind(counter_i64)
    .bind(&credential.user.user_handle)
    .bind(&credential.user.name)
    .bind(&credential.user.display_name)
    .bind(credential.created_at)
    .bind(credential.updated_at)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            CeremonyError::DuplicateCredential(format!(
                "Credential id {} already registered",
                credential.credential_id
            ))
        }
        _ => CeremonyError::Storage(e.to_string()),
    })?;

    Ok(())
}

pub(super) async fn get_credential_sqlite(
    pool: &Pool<Sqlite>,
    credential_id: &str,
) -> Result<Option<StoredCredential>, CeremonyError> {
    let credentials_table = DB_TABLE_CREDENTIALS.as_str();

    sqlx::query_as::<_, StoredCredential>(&format!(
        r#"SELECT * FROM {} WHERE credential_id = ?"#,
        credentials_table
    ))
    .bind(credential_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| CeremonyError::Storage(e.to_string()))
}

pub(super) async fn get_credentials_by_field_sqlite(
    pool: &Pool<Sqlite>,
    field: &CredentialSearchField,
) -> Result<Vec<StoredCredential>, CeremonyError> {
    let credentials_table = DB_TABLE_CREDENTIALS.as_str();
    let (query, value) = match field {
        CredentialSearchField::CredentialId(credential_id) => (
            format!(
                r#"SELECT * FROM {} WHERE credential_id = ?"#,
                credentials_table
            ),
            credential_id.as_str(),
        ),
        CredentialSearchField::UserId(id) => (
            format!(r#"SELECT * FROM {} WHERE user_id = ?"#, credentials_table),
            id.as_str(),
        ),
        CredentialSearchField::UserName(name) => (
            format!(r#"SELECT * FROM {} WHERE user_name = ?"#, credentials_table),
            name.as_str(),
        ),
    };

    sqlx::query_as::<_, StoredCredential>(&query)
        .bind(value)
        .fetch_all(pool)
        .await
        .map_err(|e| CeremonyError::Storage(e.to_string()))
}

pub(super) async fn update_credential_counter_sqlite(
    pool: &Pool<Sqlite>,
    credential_id: &str,
    counter: u32,
) -> Result<(), CeremonyError> {
    let credentials_table = DB_TABLE_CREDENTIALS.as_str();
    let counter_i64 = counter as i64;

    let result = sqlx::query(&format!(
        r#"
        UPDATE {}
        SET counter = ?, updated_at = CURRENT_TIMESTAMP
        WHERE credential_id = ?
        "#,
        credentials_table
    ))
    .bind(counter_i64)
    .bind(credential_id)
    .execute(pool)
    .await
    .map_err(|e| CeremonyError::Storage(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Err(CeremonyError::NotFound(format!(
            "Credential {} not found",
            credential_id
        )));
    }

    Ok(())
}
