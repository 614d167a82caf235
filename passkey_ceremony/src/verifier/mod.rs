//! Cryptographic verification boundary.
//!
//! The ceremony engine does not implement attestation or assertion
//! cryptography. It hands the authenticator's response, the original
//! ceremony options and the relevant stored state to an implementation of
//! the traits below and trusts the verdict. Alternative cryptographic
//! backends substitute here without touching ceremony logic.

mod types;

use async_trait::async_trait;

pub use types::{VerifiedAssertion, VerifiedRegistration, VerifierError};

use crate::ceremony::{AuthenticatorResponse, RegisterCredential, StoredCredential, StoredOptions};

/// Predicate consulted by an attestation verifier before it accepts a new
/// credential id.
#[async_trait]
pub trait CredentialIdUniqueness: Send + Sync {
    /// Whether no stored credential, under any user, carries this id.
    async fn is_credential_id_unique(
        &self,
        credential_id: &str,
    ) -> Result<bool, VerifierError>;
}

/// Verifies a registration (attestation) response.
#[async_trait]
pub trait AttestationVerifier: Send + Sync {
    /// Check the attestation response against the options the ceremony was
    /// begun with, and extract the new credential.
    ///
    /// Implementations must reject responses whose challenge, origin or
    /// client data do not match `options`, and must consult `uniqueness`
    /// before accepting the credential id, failing with
    /// [`VerifierError::DuplicateCredential`] when it is already taken.
    async fn verify_attestation(
        &self,
        options: &StoredOptions,
        response: &RegisterCredential,
        uniqueness: &dyn CredentialIdUniqueness,
    ) -> Result<VerifiedRegistration, VerifierError>;
}

/// Verifies an authentication (assertion) response.
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    /// Check the assertion response against the options the ceremony was
    /// begun with and the stored credential it claims to exercise.
    ///
    /// `credential` carries the stored public key, the stored signature
    /// counter and the owner's user handle. Implementations must reject
    /// challenge/origin mismatches, signatures that do not verify against
    /// the stored key, responses whose user handle does not match the
    /// credential's owner, and counter values that regress (a clone
    /// signal). On success the reported sign count becomes the credential's
    /// new stored counter.
    async fn verify_assertion(
        &self,
        options: &StoredOptions,
        response: &AuthenticatorResponse,
        credential: &StoredCredential,
    ) -> Result<VerifiedAssertion, VerifierError>;
}
