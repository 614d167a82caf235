mod cache_store;
mod data_store;
mod errors;
mod types;

pub(crate) use cache_store::GENERIC_CACHE_STORE;
pub(crate) use types::CacheData;

pub(crate) use data_store::{DB_TABLE_CREDENTIALS, DB_TABLE_USERS, GENERIC_DATA_STORE};

pub(crate) async fn init() -> Result<(), errors::StorageError> {
    let _ = &*GENERIC_CACHE_STORE;
    let _ = &*GENERIC_DATA_STORE;

    Ok(())
}
