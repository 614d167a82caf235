mod credential_store;
mod postgres;
mod sqlite;

pub use credential_store::CredentialStore;
