use thiserror::Error;

/// Outcome of a successful attestation verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedRegistration {
    /// Credential id assigned by the authenticator, base64url encoded
    pub credential_id: String,
    /// Public key material to store, base64url encoded
    pub public_key: String,
    /// Initial signature counter reported by the authenticator
    pub sign_count: u32,
}

/// Outcome of a successful assertion verification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifiedAssertion {
    /// New signature counter reported by the authenticator
    pub sign_count: u32,
}

/// Rejections surfaced by a verifier implementation.
#[derive(Debug, Error, Clone)]
pub enum VerifierError {
    /// The client data could not be parsed or carries the wrong type
    #[error("Invalid client data: {0}")]
    ClientData(String),

    /// The response was not produced for the issued challenge
    #[error("Challenge mismatch: {0}")]
    Challenge(String),

    /// The response originates from an unexpected origin
    #[error("Origin mismatch: {0}")]
    Origin(String),

    /// The attested credential id already exists in the store
    #[error("Duplicate credential: {0}")]
    DuplicateCredential(String),

    /// The response's user handle does not match the credential's owner
    #[error("Ownership mismatch: {0}")]
    Ownership(String),

    /// The reported signature counter did not advance
    #[error("Counter regression: {0}")]
    CounterRegression(String),

    /// The signature does not verify against the stored public key
    #[error("Signature verification failed: {0}")]
    Signature(String),

    /// The verifier could not consult backing storage
    #[error("Storage error: {0}")]
    Storage(String),
}
