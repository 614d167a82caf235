use std::{env, sync::LazyLock};

pub(super) static PASSKEY_RP_ID: LazyLock<String> =
    LazyLock::new(|| env::var("PASSKEY_RP_ID").unwrap_or_else(|_| "localhost".to_string()));

pub(super) static PASSKEY_RP_NAME: LazyLock<String> =
    LazyLock::new(|| env::var("PASSKEY_RP_NAME").unwrap_or_else(|_| PASSKEY_RP_ID.clone()));

/// How long the client gets to complete a ceremony, in seconds.
pub(super) static PASSKEY_TIMEOUT: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSKEY_TIMEOUT")
        .map(|v| v.parse::<u32>().unwrap_or(60))
        .unwrap_or(60)
});

/// How long a pending challenge stays valid, in seconds.
pub(super) static PASSKEY_CHALLENGE_TIMEOUT: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSKEY_CHALLENGE_TIMEOUT")
        .map(|v| v.parse::<u32>().unwrap_or(60))
        .unwrap_or(60)
});

pub(super) static PASSKEY_ATTESTATION: LazyLock<String> =
    LazyLock::new(|| match env::var("PASSKEY_ATTESTATION").ok() {
        None => "none".to_string(),
        Some(v) => parse_attestation(&v),
    });

pub(super) static PASSKEY_RESIDENT_KEY: LazyLock<String> =
    LazyLock::new(|| match env::var("PASSKEY_RESIDENT_KEY").ok() {
        None => "preferred".to_string(),
        Some(v) => parse_requirement(&v, "preferred", "resident key"),
    });

pub(super) static PASSKEY_USER_VERIFICATION: LazyLock<String> =
    LazyLock::new(|| match env::var("PASSKEY_USER_VERIFICATION").ok() {
        None => "preferred".to_string(),
        Some(v) => parse_requirement(&v, "preferred", "user verification"),
    });

fn parse_attestation(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "none" => "none".to_string(),
        "direct" => "direct".to_string(),
        "indirect" => "indirect".to_string(),
        "enterprise" => "enterprise".to_string(),
        invalid => {
            tracing::warn!("Invalid attestation: {}. Using default 'none'", invalid);
            "none".to_string()
        }
    }
}

fn parse_requirement(value: &str, default: &str, what: &str) -> String {
    match value.to_lowercase().as_str() {
        "required" => "required".to_string(),
        "preferred" => "preferred".to_string(),
        "discouraged" => "discouraged".to_string(),
        invalid => {
            tracing::warn!("Invalid {}: {}. Using default '{}'", what, invalid, default);
            default.to_string()
        }
    }
}
