//! Lightrail client core
//!
//! This crate provides the security-sensitive parts of a Lightrail client:
//!
//! - **Shopper tokens**: short-lived signed tokens that let a shopper's
//!   browser or app act on behalf of a single contact
//! - **Webhook verification**: checking that an inbound event body was
//!   signed with the shared webhook secret
//! - **Configuration**: an explicit, reconfigurable settings object shared
//!   by both components
//!
//! # Example
//!
//! ```rust,no_run
//! use lightrail_client::{ConfigOptions, LightrailClient, ShopperTokenOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LightrailClient::new();
//!     client.configure(ConfigOptions::default().webhook_secret("whsec"));
//!
//!     let token = client
//!         .shopper_tokens()
//!         .generate_shopper_token("contact-123", &ShopperTokenOptions::default())?;
//!     println!("{token}");
//!
//!     let body = br#"{"type":"transaction.created"}"#;
//!     let valid = client.webhooks().verify_signature("abc123", None, body)?;
//!     println!("valid: {valid}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod shopper_token;
pub mod webhook;

pub use client::LightrailClient;
pub use config::{ConfigOptions, LightrailConfig, SharedConfig};
pub use error::{LightrailError, LightrailResult};
pub use shopper_token::{
    decode_shopper_token, ShopperTokenClaims, ShopperTokenIssuer,
    ShopperTokenOptions, DEFAULT_VALIDITY_SECONDS, SHOPPER_TOKEN_ISSUER,
};
pub use webhook::WebhookVerifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::LightrailClient;
    pub use crate::config::{ConfigOptions, LightrailConfig, SharedConfig};
    pub use crate::error::{LightrailError, LightrailResult};
    pub use crate::shopper_token::{ShopperTokenIssuer, ShopperTokenOptions};
    pub use crate::webhook::WebhookVerifier;
}
