use sqlx::{Pool, Sqlite};

use crate::storage::DB_TABLE_USERS;
use crate::userdb::{errors::UserError, types::User};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        users_table
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<User>, UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(r#"SELECT * FROM {} WHERE id = ?"#, users_table))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_name_sqlite(
    pool: &Pool<Sqlite>,
    name: &str,
) -> Result<Option<User>, UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(r#"SELECT * FROM {} WHERE name = ?"#, users_table))
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn insert_user_if_absent_sqlite(
    pool: &Pool<Sqlite>,
    user: &User,
) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, name, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (name) DO NOTHING
        "#,
        users_table
    ))
    .bind(&user.id)
    .bind(&user.name)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}
