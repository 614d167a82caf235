mod config;
mod errors;
mod main;
mod storage;
mod types;

pub use errors::CeremonyError;

pub use main::{
    ANONYMOUS_SUBJECT, AuthenticationOptions, AuthenticationResult,
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, AuthenticatorResponse,
    RegisterCredential, RegistrationOptions, finish_authentication, finish_registration,
    start_authentication, start_registration,
};

pub use storage::CredentialStore;
pub use types::{
    CredentialDescriptor, CredentialSearchField, PublicKeyCredentialUserEntity, StoredCredential,
    StoredOptions,
};

pub(crate) async fn init() -> Result<(), CeremonyError> {
    // Resolve the policy configuration early so a bad environment fails at
    // startup, not mid-ceremony
    let _ = config::PASSKEY_RP_ID.as_str();

    crate::storage::init()
        .await
        .map_err(|e| CeremonyError::Storage(e.to_string()))?;

    CredentialStore::init().await
}
