//! Shared test initialization and synthetic ceremony helpers.
//!
//! The verifiers here exercise the protocol contract — challenge binding,
//! credential-id uniqueness, ownership and counter monotonicity — over a
//! JSON stand-in for the authenticator payloads, so ceremony tests run
//! without any cryptography.

use std::sync::Once;

use async_trait::async_trait;

use crate::ceremony::{
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, AuthenticatorResponse,
    RegisterCredential, StoredCredential, StoredOptions,
};
use crate::utils::{base64url_decode, base64url_encode};
use crate::verifier::{
    AssertionVerifier, AttestationVerifier, CredentialIdUniqueness, VerifiedAssertion,
    VerifiedRegistration, VerifierError,
};

/// Centralized test initialization for all tests in the crate.
///
/// Loads `.env_test` (falling back to `.env`) once, then makes sure the
/// backing tables exist. Safe to call from every test.
pub(crate) async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });

    if let Err(e) = crate::init().await {
        eprintln!("Warning: failed to initialize test stores: {e}");
    }
}

fn decode_json(field: &str, encoded: &str) -> Result<serde_json::Value, VerifierError> {
    let raw = base64url_decode(encoded)
        .map_err(|e| VerifierError::ClientData(format!("Failed to decode {field}: {e}")))?;
    serde_json::from_slice(&raw)
        .map_err(|e| VerifierError::ClientData(format!("Invalid JSON in {field}: {e}")))
}

fn check_client_data(
    client_data_json: &str,
    expected_type: &str,
    expected_challenge: &str,
) -> Result<(), VerifierError> {
    let client_data = decode_json("clientDataJSON", client_data_json)?;

    if client_data["type"] != expected_type {
        return Err(VerifierError::ClientData(format!(
            "Expected type {expected_type}, got {}",
            client_data["type"]
        )));
    }
    if client_data["challenge"] != expected_challenge {
        return Err(VerifierError::Challenge(
            "Response was not produced for the issued challenge".to_string(),
        ));
    }

    Ok(())
}

/// Attestation verifier over the synthetic payload format.
pub(crate) struct TestAttestationVerifier;

#[async_trait]
impl AttestationVerifier for TestAttestationVerifier {
    async fn verify_attestation(
        &self,
        options: &StoredOptions,
        response: &RegisterCredential,
        uniqueness: &dyn CredentialIdUniqueness,
    ) -> Result<VerifiedRegistration, VerifierError> {
        check_client_data(
            &response.response.client_data_json,
            "webauthn.create",
            &options.challenge,
        )?;

        let attestation = decode_json("attestationObject", &response.response.attestation_object)?;
        let credential_id = attestation["credentialId"]
            .as_str()
            .ok_or_else(|| VerifierError::ClientData("Missing credentialId".to_string()))?
            .to_string();
        let public_key = attestation["publicKey"]
            .as_str()
            .ok_or_else(|| VerifierError::ClientData("Missing publicKey".to_string()))?
            .to_string();
        let sign_count = attestation["signCount"].as_u64().unwrap_or(0) as u32;

        if !uniqueness.is_credential_id_unique(&credential_id).await? {
            return Err(VerifierError::DuplicateCredential(format!(
                "Credential id {credential_id} already registered"
            )));
        }

        Ok(VerifiedRegistration {
            credential_id,
            public_key,
            sign_count,
        })
    }
}

/// Assertion verifier over the synthetic payload format.
pub(crate) struct TestAssertionVerifier;

#[async_trait]
impl AssertionVerifier for TestAssertionVerifier {
    async fn verify_assertion(
        &self,
        options: &StoredOptions,
        response: &AuthenticatorResponse,
        credential: &StoredCredential,
    ) -> Result<VerifiedAssertion, VerifierError> {
        check_client_data(
            &response.response.client_data_json,
            "webauthn.get",
            &options.challenge,
        )?;

        if response.response.signature.is_empty() {
            return Err(VerifierError::Signature("Missing signature".to_string()));
        }

        if let Some(handle) = &response.response.user_handle {
            if *handle != credential.user_id {
                return Err(VerifierError::Ownership(format!(
                    "User handle {handle} does not own credential {}",
                    credential.credential_id
                )));
            }
        }

        let auth_data = decode_json("authenticatorData", &response.response.authenticator_data)?;
        let sign_count = auth_data["signCount"].as_u64().unwrap_or(0) as u32;

        // A zero counter means the authenticator does not support counters
        if sign_count != 0 && sign_count <= credential.counter {
            return Err(VerifierError::CounterRegression(format!(
                "stored {}, received {}",
                credential.counter, sign_count
            )));
        }

        Ok(VerifiedAssertion { sign_count })
    }
}

fn encode_json(value: &serde_json::Value) -> String {
    base64url_encode(serde_json::to_vec(value).expect("Failed to serialize test payload"))
}

/// Builds a synthetic attestation response for `challenge`.
pub(crate) fn make_attestation_response(
    challenge: &str,
    credential_id: &str,
    public_key: &str,
    sign_count: u32,
) -> RegisterCredential {
    let client_data = encode_json(&serde_json::json!({
        "type": "webauthn.create",
        "challenge": challenge,
        "origin": "https://localhost:5001",
    }));
    let attestation_object = encode_json(&serde_json::json!({
        "credentialId": credential_id,
        "publicKey": public_key,
        "signCount": sign_count,
    }));

    RegisterCredential {
        id: credential_id.to_string(),
        raw_id: credential_id.to_string(),
        type_: "public-key".to_string(),
        response: AuthenticatorAttestationResponse {
            client_data_json: client_data,
            attestation_object,
        },
    }
}

/// Builds a synthetic assertion response for `challenge`.
pub(crate) fn make_assertion_response(
    challenge: &str,
    credential_id: &str,
    user_handle: Option<&str>,
    sign_count: u32,
) -> AuthenticatorResponse {
    let client_data = encode_json(&serde_json::json!({
        "type": "webauthn.get",
        "challenge": challenge,
        "origin": "https://localhost:5001",
    }));
    let authenticator_data = encode_json(&serde_json::json!({
        "signCount": sign_count,
    }));

    AuthenticatorResponse {
        id: credential_id.to_string(),
        raw_id: credential_id.to_string(),
        type_: "public-key".to_string(),
        response: AuthenticatorAssertionResponse {
            client_data_json: client_data,
            authenticator_data,
            signature: base64url_encode(b"test-signature"),
            user_handle: user_handle.map(|h| h.to_string()),
        },
    }
}
