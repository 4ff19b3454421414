//! Cryptographic primitives for Lightrail webhooks.
//!
//! This crate provides:
//! - HMAC-SHA256 signature generation
//! - Constant-time comparison for security
//! - Verification of comma-separated webhook signature headers

#![warn(missing_docs)]

mod error;
mod hmac_impl;
mod timing;
mod webhook;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{CryptoError, Result};
pub use hmac_impl::{hmac_sha256, hmac_sha256_bytes, SHA256_HEX_LEN};
pub use timing::{constant_time_compare, constant_time_eq_choice};
pub use webhook::{
    sign_webhook_payload, split_signature_header, verify_webhook_signature, SIGNATURE_SEPARATOR,
};
