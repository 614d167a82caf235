use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

/// Decodes a base64url string (no padding), as used for challenge nonces,
/// credential ids and key material throughout the ceremonies.
pub fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))
}

pub fn base64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Generates `len` random bytes and returns them base64url encoded.
///
/// Used for challenge nonces and other unguessable identifiers.
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(base64url_encode(buf))
}
