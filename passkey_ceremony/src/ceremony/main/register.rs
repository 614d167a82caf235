use async_trait::async_trait;
use chrono::Utc;

use super::challenge::{REGISTRATION_CHALLENGE, now_unix_secs, store_options, take_options};
use super::types::{
    AuthenticatorSelection, PubKeyCredParam, RegisterCredential, RegistrationOptions, RelyingParty,
};

use crate::ceremony::config::{
    PASSKEY_ATTESTATION, PASSKEY_CHALLENGE_TIMEOUT, PASSKEY_RESIDENT_KEY, PASSKEY_RP_ID,
    PASSKEY_RP_NAME, PASSKEY_TIMEOUT, PASSKEY_USER_VERIFICATION,
};
use crate::ceremony::errors::CeremonyError;
use crate::ceremony::storage::CredentialStore;
use crate::ceremony::types::{
    CredentialDescriptor, CredentialSearchField, PublicKeyCredentialUserEntity, StoredCredential,
    StoredOptions,
};
use crate::userdb::UserStore;
use crate::utils::gen_random_string;
use crate::verifier::{AttestationVerifier, CredentialIdUniqueness, VerifierError};

/// Uniqueness predicate handed to the attestation verifier, backed by the
/// credential store.
struct StoreUniqueness;

#[async_trait]
impl CredentialIdUniqueness for StoreUniqueness {
    async fn is_credential_id_unique(
        &self,
        credential_id: &str,
    ) -> Result<bool, VerifierError> {
        CredentialStore::is_credential_id_unique(credential_id)
            .await
            .map_err(|e| VerifierError::Storage(e.to_string()))
    }
}

/// Begins a registration ceremony for `username`.
///
/// Resolves or creates the user, computes the exclusion list from the
/// credentials the user already owns, stores the pending challenge keyed by
/// the username (replacing any previous one) and returns the options for
/// the client.
pub async fn start_registration(username: &str) -> Result<RegistrationOptions, CeremonyError> {
    if username.trim().is_empty() {
        return Err(CeremonyError::Format(
            "Username must not be empty".to_string(),
        ));
    }

    let user = UserStore::get_or_create_user(username).await?;

    let exclude_credentials: Vec<CredentialDescriptor> =
        CredentialStore::get_credentials_by(CredentialSearchField::UserId(user.id.clone()))
            .await?
            .iter()
            .map(CredentialDescriptor::from)
            .collect();

    let user_entity = PublicKeyCredentialUserEntity {
        user_handle: user.id.clone(),
        name: user.name.clone(),
        display_name: user.name.clone(),
    };

    let challenge_str = gen_random_string(32)?;

    let stored_options = StoredOptions {
        challenge: challenge_str.clone(),
        user: Some(user_entity.clone()),
        user_verification: PASSKEY_USER_VERIFICATION.to_string(),
        credentials: exclude_credentials.clone(),
        timestamp: now_unix_secs(),
        ttl: *PASSKEY_CHALLENGE_TIMEOUT as u64,
    };

    store_options(REGISTRATION_CHALLENGE, username, stored_options).await?;

    let options = RegistrationOptions {
        challenge: challenge_str,
        rp_id: PASSKEY_RP_ID.to_string(),
        rp: RelyingParty {
            name: PASSKEY_RP_NAME.to_string(),
            id: PASSKEY_RP_ID.to_string(),
        },
        user: user_entity,
        pub_key_cred_params: vec![
            PubKeyCredParam {
                type_: "public-key".to_string(),
                alg: -7,
            },
            PubKeyCredParam {
                type_: "public-key".to_string(),
                alg: -257,
            },
        ],
        authenticator_selection: AuthenticatorSelection {
            resident_key: PASSKEY_RESIDENT_KEY.to_string(),
            require_resident_key: *PASSKEY_RESIDENT_KEY == "required",
            user_verification: PASSKEY_USER_VERIFICATION.to_string(),
        },
        exclude_credentials,
        timeout: (*PASSKEY_TIMEOUT) * 1000, // Convert seconds to milliseconds
        attestation: PASSKEY_ATTESTATION.to_string(),
    };

    tracing::debug!("Registration options for {}: {:?}", username, options);

    Ok(options)
}

/// Finishes a registration ceremony.
///
/// Consumes the pending challenge for `username` (single use), hands the
/// attestation response and the original options to the verifier, and on
/// success stores the new credential under the resolved user. Returns the
/// new credential id.
pub async fn finish_registration(
    verifier: &dyn AttestationVerifier,
    username: &str,
    reg_data: &RegisterCredential,
) -> Result<String, CeremonyError> {
    tracing::debug!("finish_registration for {}: {:?}", username, reg_data);

    let stored_options = take_options(REGISTRATION_CHALLENGE, username).await?;

    let verified = verifier
        .verify_attestation(&stored_options, reg_data, &StoreUniqueness)
        .await?;

    // The begin step created the user; resolving again is idempotent
    let user = UserStore::get_or_create_user(username).await?;

    let user_entity = stored_options.user.unwrap_or_else(|| {
        PublicKeyCredentialUserEntity {
            user_handle: user.id.clone(),
            name: user.name.clone(),
            display_name: user.name.clone(),
        }
    });

    let now = Utc::now();
    let credential = StoredCredential {
        credential_id: verified.credential_id.clone(),
        user_id: user.id,
        public_key: verified.public_key,
        counter: verified.sign_count,
        user: user_entity,
        created_at: now,
        updated_at: now,
    };

    CredentialStore::store_credential(credential).await?;

    tracing::info!(
        "Registered credential {} for {}",
        verified.credential_id,
        username
    );

    Ok(verified.credential_id)
}
