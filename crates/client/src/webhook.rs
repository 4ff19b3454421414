//! Webhook signature verification
//!
//! Lightrail signs each webhook body with HMAC-SHA256 and sends the hex
//! digest in a signature header. During secret rotation the header holds
//! several comma-separated digests.

use crate::config::SharedConfig;
use crate::error::{LightrailError, LightrailResult};
use lightrail_crypto::{sign_webhook_payload, verify_webhook_signature};
use tracing::{debug, instrument};

/// Verifies webhook signatures against an explicit or configured secret
#[derive(Clone, Debug)]
pub struct WebhookVerifier {
    config: SharedConfig,
}

impl WebhookVerifier {
    /// Create a verifier reading its default secret from `config`
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Verify `signature_header` for `payload`
    ///
    /// `secret` takes precedence when it is `Some` and non-empty; otherwise
    /// the configured webhook secret is used.
    ///
    /// Returns `Ok(false)` when the request is well formed but no candidate
    /// signature matches.
    ///
    /// # Errors
    ///
    /// [`LightrailError::Argument`] if the header or payload is empty, or if
    /// neither `secret` nor the configured webhook secret is set.
    #[instrument(skip_all, fields(payload_len = payload.as_ref().len()))]
    pub fn verify_signature(
        &self,
        signature_header: &str,
        secret: Option<&str>,
        payload: impl AsRef<[u8]>,
    ) -> LightrailResult<bool> {
        let secret = self.resolve_secret(secret);
        let valid = verify_webhook_signature(
            signature_header,
            secret.as_bytes(),
            payload.as_ref(),
        )?;

        debug!(valid, "Checked webhook signature");
        Ok(valid)
    }

    /// Compute the signature header value for `payload`
    ///
    /// # Errors
    ///
    /// [`LightrailError::Argument`] if no secret is available or the payload
    /// is empty.
    pub fn sign(&self, payload: impl AsRef<[u8]>, secret: Option<&str>) -> LightrailResult<String> {
        let secret = self.resolve_secret(secret);
        if secret.is_empty() {
            return Err(LightrailError::argument("secret must not be empty"));
        }
        if payload.as_ref().is_empty() {
            return Err(LightrailError::argument("payload must not be empty"));
        }
        Ok(sign_webhook_payload(secret.as_bytes(), payload.as_ref()))
    }

    /// Explicit secret if non-empty, else the configured one, else empty
    fn resolve_secret(&self, secret: Option<&str>) -> String {
        match secret.filter(|s| !s.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => self
                .config
                .snapshot()
                .webhook_secret()
                .unwrap_or_default()
                .to_string(),
        }
    }
}
