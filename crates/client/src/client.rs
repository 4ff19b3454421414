//! Main client facade

use crate::config::{ConfigOptions, LightrailConfig, SharedConfig};
use crate::shopper_token::ShopperTokenIssuer;
use crate::webhook::WebhookVerifier;
use tracing::debug;

/// Lightrail client
///
/// Owns the shared configuration and hands out the components that read it.
/// Components obtained from a client observe later calls to
/// [`configure`](Self::configure).
#[derive(Clone, Debug, Default)]
pub struct LightrailClient {
    config: SharedConfig,
}

impl LightrailClient {
    /// Create a new client with configuration from the environment
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LightrailConfig::from_env())
    }

    /// Create a new client with specific configuration
    #[must_use]
    pub fn with_config(config: LightrailConfig) -> Self {
        debug!(
            api_key = config.api_key().is_some(),
            shared_secret = config.shared_secret().is_some(),
            webhook_secret = config.webhook_secret().is_some(),
            "Creating Lightrail client"
        );
        Self {
            config: SharedConfig::new(config),
        }
    }

    /// Apply a partial configuration update
    pub fn configure(&self, options: ConfigOptions) {
        self.config.update(options);
    }

    /// Get a copy of the current configuration
    #[must_use]
    pub fn config(&self) -> LightrailConfig {
        self.config.snapshot()
    }

    /// Get the shared configuration handle
    #[must_use]
    pub fn shared_config(&self) -> &SharedConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Component accessors
    // -------------------------------------------------------------------------

    /// Access shopper token issuance
    #[must_use]
    pub fn shopper_tokens(&self) -> ShopperTokenIssuer {
        ShopperTokenIssuer::new(self.config.clone())
    }

    /// Access webhook signature verification
    #[must_use]
    pub fn webhooks(&self) -> WebhookVerifier {
        WebhookVerifier::new(self.config.clone())
    }
}
