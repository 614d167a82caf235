mod auth;
mod challenge;
mod register;
mod types;

pub use types::{
    AuthenticationOptions, AuthenticationResult, AuthenticatorAssertionResponse,
    AuthenticatorAttestationResponse, AuthenticatorResponse, RegisterCredential,
    RegistrationOptions,
};

pub use auth::{ANONYMOUS_SUBJECT, finish_authentication, start_authentication};
pub use register::{finish_registration, start_registration};
