use serde::{Deserialize, Serialize};

use crate::ceremony::types::{CredentialDescriptor, PublicKeyCredentialUserEntity};

/// Options returned by a registration begin step.
///
/// Follows the WebAuthn shape consumed by `navigator.credentials.create()`;
/// the transport adapter serializes it as-is.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptions {
    pub challenge: String,
    pub rp_id: String,
    pub rp: RelyingParty,
    pub user: PublicKeyCredentialUserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub authenticator_selection: AuthenticatorSelection,
    /// Descriptors of credentials the user already owns, so the
    /// authenticator refuses to re-register itself
    pub exclude_credentials: Vec<CredentialDescriptor>,
    pub timeout: u32,
    pub attestation: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RelyingParty {
    pub name: String,
    pub id: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub type_: String,
    pub alg: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    pub resident_key: String,
    pub require_resident_key: bool,
    pub user_verification: String,
}

/// Options returned by an authentication begin step.
///
/// Follows the WebAuthn shape consumed by `navigator.credentials.get()`.
/// An empty allow list selects the discoverable-credential flow where the
/// authenticator itself supplies the credential id.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptions {
    pub challenge: String,
    pub timeout: u32,
    pub rp_id: String,
    pub allow_credentials: Vec<CredentialDescriptor>,
    pub user_verification: String,
}

/// Attestation response submitted to finish a registration ceremony.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredential {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AuthenticatorAttestationResponse,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAttestationResponse {
    pub client_data_json: String,
    pub attestation_object: String,
}

/// Assertion response submitted to finish an authentication ceremony.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorResponse {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AuthenticatorAssertionResponse,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponse {
    pub client_data_json: String,
    pub authenticator_data: String,
    pub signature: String,
    pub user_handle: Option<String>,
}

/// Outcome of a successful authentication finish step.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AuthenticationResult {
    /// Id of the authenticated user
    pub user_id: String,
    /// Resolved account name, taken from the stored credential so the
    /// discoverable flow resolves it too
    pub user_name: String,
    /// New signature counter as reported by the verifier
    pub counter: u32,
}
