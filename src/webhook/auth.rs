//! Shared-secret gate on inbound webhook requests

use axum::http::{HeaderMap, HeaderName};
use secrecy::{ExposeSecret, SecretString};

/// Lowercase form of [`crate::core::config::SECRET_HEADER`]
static SECRET_HEADER: HeaderName = HeaderName::from_static("x-telegram-bot-api-secret-token");

/// Checks the secret header against the configured secret.
///
/// With no secret configured every request passes. Otherwise the header must
/// be present and equal to the secret byte for byte.
pub fn verify_secret(headers: &HeaderMap, expected: Option<&SecretString>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    match headers.get(&SECRET_HEADER) {
        Some(value) => value.as_bytes() == expected.expose_secret().as_bytes(),
        None => false,
    }
}
