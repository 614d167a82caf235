use thiserror::Error;

use crate::userdb::UserError;
use crate::utils::UtilError;
use crate::verifier::VerifierError;

/// Errors that can occur while running registration and authentication
/// ceremonies.
///
/// Every failure is terminal for the ceremony attempt: the core never
/// retries, the caller restarts from the begin step.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// No pending challenge for the given key: the ceremony never began,
    /// was already consumed, or was overwritten by a later begin
    #[error("Missing challenge: {0}")]
    MissingChallenge(String),

    /// A credential with this id already exists in the store
    #[error("Duplicate credential: {0}")]
    DuplicateCredential(String),

    /// An assertion references a credential id not in the store
    #[error("Unknown credential: {0}")]
    UnknownCredential(String),

    /// The verifier rejected the response (bad signature, origin or
    /// challenge mismatch, ownership mismatch, counter regression)
    #[error("Verification failed: {0}")]
    Verification(String),

    /// A referenced entity was absent during a mutation
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error related to ceremony configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error accessing or modifying stored ceremony data
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error with improperly formatted input
    #[error("Invalid format: {0}")]
    Format(String),

    /// Error from utility operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),

    /// Error from JSON serialization/deserialization
    #[error("Json conversion(Serde) error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl From<UserError> for CeremonyError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => CeremonyError::NotFound("User not found".to_string()),
            e => CeremonyError::Storage(e.to_string()),
        }
    }
}

impl From<VerifierError> for CeremonyError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::DuplicateCredential(msg) => CeremonyError::DuplicateCredential(msg),
            e => CeremonyError::Verification(e.to_string()),
        }
    }
}
