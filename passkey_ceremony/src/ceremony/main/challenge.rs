use std::time::SystemTime;

use crate::storage::GENERIC_CACHE_STORE;

use crate::ceremony::config::PASSKEY_CHALLENGE_TIMEOUT;
use crate::ceremony::errors::CeremonyError;
use crate::ceremony::types::StoredOptions;

/// Cache prefix for pending registration challenges.
pub(super) const REGISTRATION_CHALLENGE: &str = "regi_challenge";

/// Cache prefix for pending authentication challenges.
pub(super) const AUTHENTICATION_CHALLENGE: &str = "auth_challenge";

pub(super) fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Stores the pending challenge for `(challenge_type, subject_key)`,
/// replacing any existing one.
///
/// Replacement is silent: a concurrent in-flight ceremony for the same key
/// is invalidated and observes MissingChallenge when it tries to finish.
pub(super) async fn store_options(
    challenge_type: &str,
    subject_key: &str,
    options: StoredOptions,
) -> Result<(), CeremonyError> {
    let ttl = options.ttl as usize;

    GENERIC_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(challenge_type, subject_key, options.into(), ttl)
        .await
        .map_err(|e| CeremonyError::Storage(e.to_string()))?;

    tracing::debug!(
        "Stored pending {} challenge for {}",
        challenge_type,
        subject_key
    );

    Ok(())
}

/// Consumes the pending challenge for `(challenge_type, subject_key)`.
///
/// The read and the removal happen in one step, so a challenge can be
/// consumed exactly once: concurrent finish calls for the same key see
/// exactly one success, the rest fail with MissingChallenge. An entry whose
/// age exceeds its validity window is discarded and reported the same way.
pub(super) async fn take_options(
    challenge_type: &str,
    subject_key: &str,
) -> Result<StoredOptions, CeremonyError> {
    let data = GENERIC_CACHE_STORE
        .lock()
        .await
        .take(challenge_type, subject_key)
        .await
        .map_err(|e| CeremonyError::Storage(e.to_string()))?
        .ok_or_else(|| {
            CeremonyError::MissingChallenge(format!(
                "No pending {} challenge for {}",
                challenge_type, subject_key
            ))
        })?;

    let options: StoredOptions = data.try_into()?;

    let age = now_unix_secs().saturating_sub(options.timestamp);
    let timeout = options.ttl.min(*PASSKEY_CHALLENGE_TIMEOUT as u64);
    if age > timeout {
        tracing::warn!(
            "Challenge for {} expired after {} seconds (timeout: {})",
            subject_key,
            age,
            timeout
        );
        return Err(CeremonyError::MissingChallenge(
            "Challenge has expired".to_string(),
        ));
    }

    tracing::debug!("Consumed stored challenge: {:?}", options);

    Ok(options)
}
