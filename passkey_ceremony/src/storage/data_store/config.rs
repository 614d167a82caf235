//! Durable store selection and table naming

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

// Configuration
static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string())
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL")
        .unwrap_or_else(|_| "sqlite:file:passkey_ceremony?mode=memory&cache=shared".to_string())
});

pub(crate) static GENERIC_DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = GENERIC_DATA_STORE_TYPE.as_str();
    let store_url = GENERIC_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePoolOptions::new()
                    .min_connections(1)
                    .connect_lazy_with(opts),
            }) as Box<dyn DataStore>
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }) as Box<dyn DataStore>,
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});

/// Table prefix from environment variable
static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "pc_".to_string()));

pub(crate) static DB_TABLE_USERS: LazyLock<String> =
    LazyLock::new(|| format!("{}users", DB_TABLE_PREFIX.as_str()));

pub(crate) static DB_TABLE_CREDENTIALS: LazyLock<String> =
    LazyLock::new(|| format!("{}credentials", DB_TABLE_PREFIX.as_str()));
