//! passkey-ceremony - Passwordless authentication ceremony engine
//!
//! This crate issues cryptographic challenges for credential registration
//! and assertion, validates the authenticator's signed responses through a
//! pluggable verifier boundary, and maintains per-user credential state
//! used for replay and clone detection.
//!
//! The four ceremony operations are [`start_registration`],
//! [`finish_registration`], [`start_authentication`] and
//! [`finish_authentication`]. The cryptographic verification itself is not
//! implemented here: callers supply an [`AttestationVerifier`] and an
//! [`AssertionVerifier`], and the engine owns everything around them —
//! challenge issuance and single-use consumption, credential-id
//! uniqueness, counter bookkeeping and user state.

mod ceremony;
mod storage;
mod userdb;
mod utils;
mod verifier;

#[cfg(test)]
mod test_utils;

pub use ceremony::{
    ANONYMOUS_SUBJECT, AuthenticationOptions, AuthenticationResult,
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, AuthenticatorResponse,
    CeremonyError, CredentialDescriptor, CredentialSearchField, CredentialStore,
    PublicKeyCredentialUserEntity, RegisterCredential, RegistrationOptions, StoredCredential,
    StoredOptions, finish_authentication, finish_registration, start_authentication,
    start_registration,
};

pub use userdb::{User, UserError, UserStore};

pub use utils::{UtilError, base64url_decode, base64url_encode, gen_random_string};

pub use verifier::{
    AssertionVerifier, AttestationVerifier, CredentialIdUniqueness, VerifiedAssertion,
    VerifiedRegistration, VerifierError,
};

/// Initialize the backing stores and create the tables the ceremonies use.
///
/// Call once at startup, before serving ceremonies.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    userdb::init().await?;
    ceremony::init().await?;
    Ok(())
}
