use super::challenge::{AUTHENTICATION_CHALLENGE, now_unix_secs, store_options, take_options};
use super::types::{AuthenticationOptions, AuthenticationResult, AuthenticatorResponse};

use crate::ceremony::config::{
    PASSKEY_CHALLENGE_TIMEOUT, PASSKEY_RP_ID, PASSKEY_TIMEOUT, PASSKEY_USER_VERIFICATION,
};
use crate::ceremony::errors::CeremonyError;
use crate::ceremony::storage::CredentialStore;
use crate::ceremony::types::{CredentialDescriptor, CredentialSearchField, StoredOptions};
use crate::userdb::UserStore;
use crate::utils::gen_random_string;
use crate::verifier::AssertionVerifier;

/// Challenge key for authentication ceremonies begun without a username
/// (the discoverable-credential flow).
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Begins an authentication ceremony.
///
/// With a known username the allow list carries that user's credential
/// descriptors, directing the authenticator to one of them. With an absent
/// or unknown username the allow list stays empty and the authenticator
/// supplies the credential id itself. The pending challenge is keyed by the
/// username, or by [`ANONYMOUS_SUBJECT`] when none was given.
pub async fn start_authentication(
    username: Option<&str>,
) -> Result<AuthenticationOptions, CeremonyError> {
    let mut allow_credentials: Vec<CredentialDescriptor> = Vec::new();

    if let Some(name) = username {
        match UserStore::get_user_by_name(name).await? {
            Some(user) => {
                allow_credentials =
                    CredentialStore::get_credentials_by(CredentialSearchField::UserId(user.id))
                        .await?
                        .iter()
                        .map(CredentialDescriptor::from)
                        .collect();
            }
            None => {
                tracing::debug!(
                    "Unknown user {}, issuing discoverable-credential options",
                    name
                );
            }
        }
    }

    let subject_key = username.unwrap_or(ANONYMOUS_SUBJECT);
    let challenge_str = gen_random_string(32)?;

    let stored_options = StoredOptions {
        challenge: challenge_str.clone(),
        user: None,
        user_verification: PASSKEY_USER_VERIFICATION.to_string(),
        credentials: allow_credentials.clone(),
        timestamp: now_unix_secs(),
        ttl: *PASSKEY_CHALLENGE_TIMEOUT as u64,
    };

    store_options(AUTHENTICATION_CHALLENGE, subject_key, stored_options).await?;

    let options = AuthenticationOptions {
        challenge: challenge_str,
        timeout: (*PASSKEY_TIMEOUT) * 1000, // Convert seconds to milliseconds
        rp_id: PASSKEY_RP_ID.to_string(),
        allow_credentials,
        user_verification: PASSKEY_USER_VERIFICATION.to_string(),
    };

    tracing::debug!("Authentication options for {}: {:?}", subject_key, options);

    Ok(options)
}

/// Finishes an authentication ceremony.
///
/// `subject_key` must be the username the ceremony was begun with, or
/// [`ANONYMOUS_SUBJECT`] for the discoverable flow. Consumes the pending
/// challenge (single use), resolves the stored credential by the response's
/// raw id, hands everything to the verifier, and on success overwrites the
/// stored signature counter with the verifier-reported value — the
/// authenticator is authoritative, the counter is never incremented
/// locally.
pub async fn finish_authentication(
    verifier: &dyn AssertionVerifier,
    subject_key: &str,
    auth_response: &AuthenticatorResponse,
) -> Result<AuthenticationResult, CeremonyError> {
    tracing::debug!(
        "finish_authentication for {}: {:?}",
        subject_key,
        auth_response
    );

    let stored_options = take_options(AUTHENTICATION_CHALLENGE, subject_key).await?;

    let stored_credential = CredentialStore::get_credential(&auth_response.raw_id)
        .await?
        .ok_or_else(|| {
            CeremonyError::UnknownCredential(format!(
                "No stored credential matches id {}",
                auth_response.raw_id
            ))
        })?;

    let verified = verifier
        .verify_assertion(&stored_options, auth_response, &stored_credential)
        .await?;

    CredentialStore::update_credential_counter(
        &stored_credential.credential_id,
        verified.sign_count,
    )
    .await?;

    tracing::info!(
        "Authenticated {} with credential {}, counter {}",
        stored_credential.user.name,
        stored_credential.credential_id,
        verified.sign_count
    );

    Ok(AuthenticationResult {
        user_id: stored_credential.user_id,
        user_name: stored_credential.user.name,
        counter: verified.sign_count,
    })
}
