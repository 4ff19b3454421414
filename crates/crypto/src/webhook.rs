//! Webhook signature headers.
//!
//! A signature header carries one or more lowercase-hex HMAC-SHA256 digests
//! of the raw request body, separated by commas. Senders rotating their secret
//! include a digest for both the old and the new secret, so a payload is
//! accepted when any candidate matches.

use subtle::Choice;

use crate::{constant_time_eq_choice, hmac_sha256, CryptoError, Result};

/// Separator between candidate signatures in a header value.
pub const SIGNATURE_SEPARATOR: char = ',';

/// Split a signature header into its candidates.
///
/// Candidates are returned verbatim: surrounding whitespace is kept and will
/// cause that candidate not to match.
pub fn split_signature_header(header: &str) -> impl Iterator<Item = &str> {
    header.split(SIGNATURE_SEPARATOR)
}

/// Compute the signature a sender places in the header for `payload`.
pub fn sign_webhook_payload(secret: &[u8], payload: &[u8]) -> String {
    hmac_sha256(secret, payload)
}

/// Verify a webhook signature header against a payload.
///
/// Every candidate is compared against the expected digest in constant time
/// and the results are combined without branching, so the position of the
/// matching candidate does not affect timing.
///
/// # Errors
///
/// Returns [`CryptoError::MissingArgument`] when `signature_header`, `secret`
/// or `payload` is empty. A well-formed request whose signature does not
/// match yields `Ok(false)`.
pub fn verify_webhook_signature(
    signature_header: &str,
    secret: &[u8],
    payload: &[u8],
) -> Result<bool> {
    if signature_header.is_empty() {
        return Err(CryptoError::MissingArgument("signature_header"));
    }
    if secret.is_empty() {
        return Err(CryptoError::MissingArgument("secret"));
    }
    if payload.is_empty() {
        return Err(CryptoError::MissingArgument("payload"));
    }

    let expected = hmac_sha256(secret, payload);
    let matched = split_signature_header(signature_header).fold(Choice::from(0), |acc, candidate| {
        acc | constant_time_eq_choice(candidate.as_bytes(), expected.as_bytes())
    });

    Ok(matched.into())
}
