use crate::common::{StubVerifier, TestAuthenticator, setup};

use passkey_ceremony::{
    ANONYMOUS_SUBJECT, CeremonyError, CredentialStore, UserStore, finish_authentication,
    finish_registration, start_authentication, start_registration,
};

/// Registers a credential for `username` and returns the owner's user id.
async fn register(username: &str, credential_id: &str) -> String {
    setup().await;

    let options = start_registration(username).await.expect("begin failed");
    let response = TestAuthenticator::attest(&options.challenge, credential_id, "it-auth-pk", 0);
    finish_registration(&StubVerifier, username, &response)
        .await
        .expect("registration failed");

    UserStore::get_user_by_name(username)
        .await
        .unwrap()
        .expect("user missing")
        .id
}

#[tokio::test]
async fn authentication_end_to_end() {
    let user_id = register("it_auth_alice", "it-auth-alice-cred").await;

    // the allow list directs the authenticator to alice's credential
    let options = start_authentication(Some("it_auth_alice")).await.unwrap();
    assert_eq!(options.allow_credentials.len(), 1);
    assert_eq!(options.allow_credentials[0].id, "it-auth-alice-cred");

    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-alice-cred",
        Some(&user_id),
        1,
    );
    let result = finish_authentication(&StubVerifier, "it_auth_alice", &response)
        .await
        .expect("authentication failed");

    assert_eq!(result.user_name, "it_auth_alice");
    assert_eq!(result.user_id, user_id);
    assert_eq!(result.counter, 1);

    // the stored counter now carries the verifier-reported value
    let stored = CredentialStore::get_credential("it-auth-alice-cred")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.counter, 1);
}

#[tokio::test]
async fn unknown_user_gets_empty_allow_list_and_unknown_credential_fails() {
    setup().await;

    // bob never registered: the options fall back to the discoverable flow
    let options = start_authentication(Some("it_auth_bob")).await.unwrap();
    assert!(options.allow_credentials.is_empty());

    // a response whose raw id matches no stored credential is rejected
    let response =
        TestAuthenticator::assert(&options.challenge, "it-auth-bob-ghost-cred", None, 1);
    let result = finish_authentication(&StubVerifier, "it_auth_bob", &response).await;

    assert!(matches!(result, Err(CeremonyError::UnknownCredential(_))));
}

#[tokio::test]
async fn counter_monotonicity_and_clone_detection() {
    let user_id = register("it_auth_counter", "it-auth-counter-cred").await;

    // First authentication advances the counter to 1
    let options = start_authentication(Some("it_auth_counter")).await.unwrap();
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-counter-cred",
        Some(&user_id),
        1,
    );
    let result = finish_authentication(&StubVerifier, "it_auth_counter", &response)
        .await
        .unwrap();
    assert_eq!(result.counter, 1);

    // A replayed counter value signals a cloned authenticator and must not
    // touch the stored counter
    let options = start_authentication(Some("it_auth_counter")).await.unwrap();
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-counter-cred",
        Some(&user_id),
        1,
    );
    let result = finish_authentication(&StubVerifier, "it_auth_counter", &response).await;
    assert!(matches!(result, Err(CeremonyError::Verification(_))));

    let stored = CredentialStore::get_credential("it-auth-counter-cred")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.counter, 1);

    // The authenticator recovers by reporting a higher value
    let options = start_authentication(Some("it_auth_counter")).await.unwrap();
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-counter-cred",
        Some(&user_id),
        7,
    );
    let result = finish_authentication(&StubVerifier, "it_auth_counter", &response)
        .await
        .unwrap();
    assert_eq!(result.counter, 7);
}

#[tokio::test]
async fn discoverable_flow_authenticates_anonymously() {
    let user_id = register("it_auth_discoverable", "it-auth-discoverable-cred").await;

    // Begin without a username
    let options = start_authentication(None).await.unwrap();
    assert!(options.allow_credentials.is_empty());

    // The authenticator supplies the credential and the user handle itself
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-discoverable-cred",
        Some(&user_id),
        1,
    );
    let result = finish_authentication(&StubVerifier, ANONYMOUS_SUBJECT, &response)
        .await
        .expect("discoverable authentication failed");

    assert_eq!(result.user_name, "it_auth_discoverable");
}

#[tokio::test]
async fn assertion_challenge_is_single_use() {
    let user_id = register("it_auth_replay", "it-auth-replay-cred").await;

    let options = start_authentication(Some("it_auth_replay")).await.unwrap();
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-replay-cred",
        Some(&user_id),
        1,
    );

    finish_authentication(&StubVerifier, "it_auth_replay", &response)
        .await
        .expect("first finish failed");

    // Replaying the assertion cannot authenticate a second time
    let replay = finish_authentication(&StubVerifier, "it_auth_replay", &response).await;
    assert!(matches!(replay, Err(CeremonyError::MissingChallenge(_))));
}

#[tokio::test]
async fn ownership_mismatch_is_a_verification_failure() {
    let _ = register("it_auth_victim", "it-auth-victim-cred").await;
    let intruder_id = register("it_auth_intruder", "it-auth-intruder-cred").await;

    // The intruder's user handle does not own the victim's credential
    let options = start_authentication(Some("it_auth_victim")).await.unwrap();
    let response = TestAuthenticator::assert(
        &options.challenge,
        "it-auth-victim-cred",
        Some(&intruder_id),
        1,
    );
    let result = finish_authentication(&StubVerifier, "it_auth_victim", &response).await;

    assert!(matches!(result, Err(CeremonyError::Verification(_))));
}
