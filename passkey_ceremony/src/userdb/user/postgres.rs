use sqlx::{Pool, Postgres};

use crate::storage::DB_TABLE_USERS;
use crate::userdb::{errors::UserError, types::User};

// Postgres implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
        users_table
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_postgres(
    pool: &Pool<Postgres>,
    id: &str,
) -> Result<Option<User>, UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(r#"SELECT * FROM {} WHERE id = $1"#, users_table))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_name_postgres(
    pool: &Pool<Postgres>,
    name: &str,
) -> Result<Option<User>, UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(r#"SELECT * FROM {} WHERE name = $1"#, users_table))
        .bind(name)
        .fetch_optional(pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn insert_user_if_absent_postgres(
    pool: &Pool<Postgres>,
    user: &User,
) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
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
