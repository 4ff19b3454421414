//! Configuration for the Lightrail client
//!
//! Settings live in an explicit [`LightrailConfig`] value. Components receive
//! a [`SharedConfig`] handle and read a snapshot of it at the start of every
//! call, so reconfiguring at runtime takes effect on the next call without
//! any derived state being cached.

use serde::Deserialize;
use std::env;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Environment variable holding the API key (a signed token)
pub const ENV_API_KEY: &str = "LIGHTRAIL_API_KEY";

/// Environment variable holding the shared secret used to sign shopper tokens
pub const ENV_SHARED_SECRET: &str = "LIGHTRAIL_SHARED_SECRET";

/// Environment variable holding the default webhook secret
pub const ENV_WEBHOOK_SECRET: &str = "LIGHTRAIL_WEBHOOK_SECRET";

/// Client configuration
///
/// Empty strings are treated the same as unset values by the accessors.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LightrailConfig {
    /// API key; a signed token whose `g` claim identifies the merchant
    pub api_key: Option<String>,
    /// Secret used to sign shopper tokens
    pub shared_secret: Option<String>,
    /// Default secret for webhook signature verification
    pub webhook_secret: Option<String>,
}

/// A partial configuration update
///
/// Fields left as `None` keep their previous value when applied with
/// [`LightrailConfig::update`].
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOptions {
    /// New API key
    pub api_key: Option<String>,
    /// New shared secret
    pub shared_secret: Option<String>,
    /// New webhook secret
    pub webhook_secret: Option<String>,
}

impl ConfigOptions {
    /// Builder-style method to set the API key
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the shared secret
    #[must_use]
    pub fn shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    /// Builder-style method to set the webhook secret
    #[must_use]
    pub fn webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Check whether applying these options would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.shared_secret.is_none() && self.webhook_secret.is_none()
    }
}

impl LightrailConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `LIGHTRAIL_API_KEY`: API key used to identify the merchant
    /// - `LIGHTRAIL_SHARED_SECRET`: Secret used to sign shopper tokens
    /// - `LIGHTRAIL_WEBHOOK_SECRET`: Default webhook secret
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    ///
    /// Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            api_key: read(ENV_API_KEY),
            shared_secret: read(ENV_SHARED_SECRET),
            webhook_secret: read(ENV_WEBHOOK_SECRET),
        }
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder-style method to set the shared secret
    #[must_use]
    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(secret.into());
        self
    }

    /// Builder-style method to set the webhook secret
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Apply a partial update; unset options keep their current value
    pub fn update(&mut self, options: ConfigOptions) {
        if let Some(key) = options.api_key {
            self.api_key = Some(key);
        }
        if let Some(secret) = options.shared_secret {
            self.shared_secret = Some(secret);
        }
        if let Some(secret) = options.webhook_secret {
            self.webhook_secret = Some(secret);
        }
    }

    /// The API key, if set and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    /// The shared secret, if set and non-empty
    #[must_use]
    pub fn shared_secret(&self) -> Option<&str> {
        non_empty(self.shared_secret.as_deref())
    }

    /// The webhook secret, if set and non-empty
    #[must_use]
    pub fn webhook_secret(&self) -> Option<&str> {
        non_empty(self.webhook_secret.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn redact(value: Option<&str>) -> &'static str {
    match non_empty(value) {
        Some(_) => "<REDACTED>",
        None => "<unset>",
    }
}

impl fmt::Debug for LightrailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightrailConfig")
            .field("api_key", &redact(self.api_key.as_deref()))
            .field("shared_secret", &redact(self.shared_secret.as_deref()))
            .field("webhook_secret", &redact(self.webhook_secret.as_deref()))
            .finish()
    }
}

impl fmt::Debug for ConfigOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("api_key", &redact(self.api_key.as_deref()))
            .field("shared_secret", &redact(self.shared_secret.as_deref()))
            .field("webhook_secret", &redact(self.webhook_secret.as_deref()))
            .finish()
    }
}

/// Shared, reconfigurable configuration handle
///
/// Cloning the handle shares the underlying configuration.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<LightrailConfig>>,
}

impl SharedConfig {
    /// Wrap a configuration for sharing
    #[must_use]
    pub fn new(config: LightrailConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Apply a partial update
    pub fn update(&self, options: ConfigOptions) {
        if options.is_empty() {
            return;
        }
        debug!(
            api_key = options.api_key.is_some(),
            shared_secret = options.shared_secret.is_some(),
            webhook_secret = options.webhook_secret.is_some(),
            "Updating Lightrail configuration"
        );
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .update(options);
    }

    /// Take a consistent copy of the current configuration
    #[must_use]
    pub fn snapshot(&self) -> LightrailConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl From<LightrailConfig> for SharedConfig {
    fn from(config: LightrailConfig) -> Self {
        Self::new(config)
    }
}
