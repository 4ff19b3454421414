//! WASM bindings for webhook signature helpers.

use wasm_bindgen::prelude::*;

/// Generate an HMAC-SHA256 signature and return it as a hex string.
#[wasm_bindgen]
pub fn hmac_sha256_hex(key: &str, message: &str) -> String {
    crate::hmac_sha256(key.as_bytes(), message.as_bytes())
}

/// Verify a comma-separated webhook signature header.
///
/// # Arguments
/// * `signature_header` - One or more hex signatures separated by commas
/// * `secret` - The webhook secret
/// * `payload` - The raw request body
///
/// # Returns
/// true if any candidate matches, false if none does
///
/// # Errors
/// Throws when the header, secret or payload is empty, so callers can tell a
/// malformed request from a forged one.
#[wasm_bindgen]
pub fn verify_webhook_signature(
    signature_header: &str,
    secret: &str,
    payload: &str,
) -> Result<bool, JsError> {
    verify_str(signature_header, secret, payload).map_err(|e| JsError::new(&e.to_string()))
}

fn verify_str(signature_header: &str, secret: &str, payload: &str) -> crate::Result<bool> {
    crate::verify_webhook_signature(signature_header, secret.as_bytes(), payload.as_bytes())
}

/// Constant-time comparison of two strings.
#[wasm_bindgen]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    crate::constant_time_compare(a.as_bytes(), b.as_bytes())
}
