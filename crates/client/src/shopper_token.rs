//! Shopper token issuance
//!
//! A shopper token is an HS256-signed JWT that grants a shopper's client
//! access scoped to one contact. The merchant identity in the `g` claim is
//! copied from the configured API key, the contact id is added as `g.coi`,
//! and the token is signed with the shared secret.
//!
//! ```json
//! {
//!   "g": { "gui": "user-id", "gmi": "merchant-id", "coi": "contact-id" },
//!   "iss": "MERCHANT",
//!   "iat": 1700000000,
//!   "exp": 1700003600,
//!   "metadata": { "any": "json" }
//! }
//! ```

use crate::config::SharedConfig;
use crate::error::{LightrailError, LightrailResult};
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Validity applied when the caller does not choose one
pub const DEFAULT_VALIDITY_SECONDS: u64 = 3600;

/// Value of the `iss` claim of every shopper token
pub const SHOPPER_TOKEN_ISSUER: &str = "MERCHANT";

/// Options for [`ShopperTokenIssuer::generate_shopper_token`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopperTokenOptions {
    /// Token lifetime in seconds; must be positive
    pub validity_in_seconds: Option<u64>,
    /// Arbitrary data embedded verbatim in the `metadata` claim
    pub metadata: Option<Map<String, Value>>,
}

impl ShopperTokenOptions {
    /// Builder-style method to set the validity
    #[must_use]
    pub fn with_validity(mut self, seconds: u64) -> Self {
        self.validity_in_seconds = Some(seconds);
        self
    }

    /// Builder-style method to set the metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Claims of a shopper token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopperTokenClaims {
    /// Identity claim: the API key's `g` object plus `coi`
    pub g: Map<String, Value>,
    /// Issuer, always [`SHOPPER_TOKEN_ISSUER`]
    pub iss: String,
    /// Issued at (Unix seconds)
    pub iat: u64,
    /// Expiration (Unix seconds)
    pub exp: u64,
    /// Caller-supplied metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ShopperTokenClaims {
    /// Contact id the token is scoped to; empty for an anonymous shopper
    #[must_use]
    pub fn contact_id(&self) -> Option<&str> {
        self.g.get("coi").and_then(Value::as_str)
    }

    /// User id of the key owner (`g.gui`)
    #[must_use]
    pub fn user_id(&self) -> Option<&Value> {
        self.g.get("gui")
    }

    /// Merchant id of the key owner (`g.gmi`)
    #[must_use]
    pub fn merchant_id(&self) -> Option<&Value> {
        self.g.get("gmi")
    }

    /// Lifetime of the token in seconds
    #[must_use]
    pub fn validity_seconds(&self) -> u64 {
        self.exp.saturating_sub(self.iat)
    }
}

/// The part of the API key needed to mint shopper tokens
#[derive(Deserialize)]
struct ApiKeyClaims {
    g: Map<String, Value>,
}

/// Issues shopper tokens from the shared configuration
#[derive(Clone, Debug)]
pub struct ShopperTokenIssuer {
    config: SharedConfig,
}

impl ShopperTokenIssuer {
    /// Create an issuer reading from `config`
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// Generate a shopper token for `contact_id`, issued now
    ///
    /// `contact_id` may be empty, which yields a token with `g.coi == ""`.
    ///
    /// # Errors
    ///
    /// - [`LightrailError::Argument`] if the validity is zero
    /// - [`LightrailError::Config`] if the API key or shared secret is unset
    /// - [`LightrailError::InvalidApiKey`] if the API key cannot be decoded
    pub fn generate_shopper_token(
        &self,
        contact_id: &str,
        options: &ShopperTokenOptions,
    ) -> LightrailResult<String> {
        self.generate_shopper_token_at(contact_id, options, get_current_timestamp())
    }

    /// Generate a shopper token with an explicit issue time (Unix seconds)
    ///
    /// # Errors
    ///
    /// Same as [`generate_shopper_token`](Self::generate_shopper_token).
    #[instrument(skip(self, contact_id, options), fields(validity))]
    pub fn generate_shopper_token_at(
        &self,
        contact_id: &str,
        options: &ShopperTokenOptions,
        issued_at: u64,
    ) -> LightrailResult<String> {
        let validity = match options.validity_in_seconds {
            None => DEFAULT_VALIDITY_SECONDS,
            Some(0) => {
                return Err(LightrailError::argument(
                    "validity_in_seconds must be a positive number of seconds",
                ))
            }
            Some(seconds) => seconds,
        };
        tracing::Span::current().record("validity", validity);

        let config = self.config.snapshot();
        let api_key = config
            .api_key()
            .ok_or_else(|| LightrailError::config("api_key is not set"))?;
        let shared_secret = config
            .shared_secret()
            .ok_or_else(|| LightrailError::config("shared_secret is not set"))?;

        let exp = issued_at
            .checked_add(validity)
            .ok_or_else(|| LightrailError::argument("validity_in_seconds is too large"))?;

        let claims = ShopperTokenClaims {
            g: grant_from_api_key(api_key, contact_id)?,
            iss: SHOPPER_TOKEN_ISSUER.to_string(),
            iat: issued_at,
            exp,
            metadata: options.metadata.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(shared_secret.as_bytes()),
        )?;

        debug!(
            iat = claims.iat,
            exp = claims.exp,
            has_metadata = claims.metadata.is_some(),
            "Issued shopper token"
        );
        Ok(token)
    }
}

/// Verify and decode a shopper token signed with `shared_secret`
///
/// Checks the HS256 signature, the `MERCHANT` issuer and expiry.
///
/// # Errors
///
/// [`LightrailError::Argument`] for an empty secret, [`LightrailError::Token`]
/// when the token is malformed, forged or expired.
pub fn decode_shopper_token(
    token: &str,
    shared_secret: &str,
) -> LightrailResult<ShopperTokenClaims> {
    if shared_secret.is_empty() {
        return Err(LightrailError::argument("shared_secret must not be empty"));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SHOPPER_TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let data = decode::<ShopperTokenClaims>(
        token,
        &DecodingKey::from_secret(shared_secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Build the `g` claim from the API key's own `g` claim plus `coi`.
///
/// Every field of the key's `g` is copied as-is. The API key's signature is
/// not checked here; it was issued by Lightrail and is trusted as configured.
fn grant_from_api_key(api_key: &str, contact_id: &str) -> LightrailResult<Map<String, Value>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ApiKeyClaims>(api_key, &DecodingKey::from_secret(&[]), &validation)
        .map_err(LightrailError::InvalidApiKey)?;

    let mut g = data.claims.g;
    g.insert("coi".to_string(), Value::String(contact_id.to_string()));
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOptions, LightrailConfig};
    use serde_json::json;

    fn api_key_with(claims: &Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"lightrail-side-secret"),
        )
        .unwrap()
    }

    fn issuer() -> ShopperTokenIssuer {
        let api_key = api_key_with(&json!({ "g": { "gui": "gooey", "gmi": "germie" } }));
        let config = LightrailConfig::default()
            .with_api_key(api_key)
            .with_shared_secret("secret");
        ShopperTokenIssuer::new(SharedConfig::new(config))
    }

    fn raw_payload(token: &str) -> Value {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        decode::<Value>(token, &DecodingKey::from_secret(b"secret"), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_issues_expected_claims() {
        let options = ShopperTokenOptions::default().with_validity(600);
        let token = issuer()
            .generate_shopper_token("chauntaktEyeDee", &options)
            .unwrap();

        let claims = decode_shopper_token(&token, "secret").unwrap();
        assert_eq!(
            Value::Object(claims.g.clone()),
            json!({ "gui": "gooey", "gmi": "germie", "coi": "chauntaktEyeDee" })
        );
        assert_eq!(claims.contact_id(), Some("chauntaktEyeDee"));
        assert_eq!(claims.iss, "MERCHANT");
        assert_eq!(claims.exp, claims.iat + 600);
        assert!(claims.metadata.is_none());
    }

    #[test]
    fn test_validity_window_is_exact() {
        let issuer = issuer();
        for validity in [1, 600, 999] {
            let options = ShopperTokenOptions::default().with_validity(validity);
            let token = issuer.generate_shopper_token("contact", &options).unwrap();
            let claims = decode_shopper_token(&token, "secret").unwrap();
            assert_eq!(claims.validity_seconds(), validity);
        }
    }

    #[test]
    fn test_default_validity() {
        let token = issuer()
            .generate_shopper_token_at("contact", &ShopperTokenOptions::default(), 1_000)
            .unwrap();
        let payload = raw_payload(&token);
        assert_eq!(payload["iat"], json!(1_000));
        assert_eq!(payload["exp"], json!(1_000 + DEFAULT_VALIDITY_SECONDS));
    }

    #[test]
    fn test_empty_contact_id_is_kept() {
        let token = issuer()
            .generate_shopper_token("", &ShopperTokenOptions::default())
            .unwrap();

        let payload = raw_payload(&token);
        let g = payload["g"].as_object().unwrap();
        assert_eq!(g.get("coi"), Some(&json!("")));

        let claims = decode_shopper_token(&token, "secret").unwrap();
        assert_eq!(claims.contact_id(), Some(""));
    }

    #[test]
    fn test_metadata_round_trips() {
        let metadata = json!({ "cart": { "items": [1, 2, 3], "total": 12.5 }, "vip": true });
        let options = ShopperTokenOptions::default()
            .with_metadata(metadata.as_object().unwrap().clone());

        let token = issuer().generate_shopper_token("contact", &options).unwrap();

        let claims = decode_shopper_token(&token, "secret").unwrap();
        assert_eq!(claims.metadata, metadata.as_object().cloned());
    }

    #[test]
    fn test_metadata_omitted_when_absent() {
        let token = issuer()
            .generate_shopper_token("contact", &ShopperTokenOptions::default())
            .unwrap();
        assert!(raw_payload(&token).get("metadata").is_none());
    }

    #[test]
    fn test_header_is_hs256_jwt() {
        let token = issuer()
            .generate_shopper_token("contact", &ShopperTokenOptions::default())
            .unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_extra_identity_fields_preserved_and_coi_overwritten() {
        let api_key = api_key_with(&json!({
            "g": { "gui": "u", "gmi": "m", "tmi": "t", "coi": "stale" },
            "iss": "LIGHTRAIL"
        }));
        let config = LightrailConfig::default()
            .with_api_key(api_key)
            .with_shared_secret("secret");
        let issuer = ShopperTokenIssuer::new(config.into());

        let token = issuer
            .generate_shopper_token("fresh", &ShopperTokenOptions::default())
            .unwrap();

        let claims = decode_shopper_token(&token, "secret").unwrap();
        assert_eq!(claims.contact_id(), Some("fresh"));
        assert_eq!(claims.g.get("tmi"), Some(&json!("t")));
        assert_eq!(claims.iss, "MERCHANT");
    }

    #[test]
    fn test_identity_fields_copied_verbatim() {
        let api_key = api_key_with(&json!({
            "g": { "gui": null, "gmi": 42, "tags": ["a", "b"] }
        }));
        let issuer = ShopperTokenIssuer::new(
            LightrailConfig::default()
                .with_api_key(api_key)
                .with_shared_secret("secret")
                .into(),
        );

        let token = issuer
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap();

        let payload = raw_payload(&token);
        assert_eq!(
            payload["g"],
            json!({ "gui": null, "gmi": 42, "tags": ["a", "b"], "coi": "c" })
        );

        let claims = decode_shopper_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id(), Some(&Value::Null));
        assert_eq!(claims.merchant_id(), Some(&json!(42)));
    }

    #[test]
    fn test_zero_validity_rejected() {
        let options = ShopperTokenOptions::default().with_validity(0);
        let err = issuer().generate_shopper_token("c", &options).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_missing_configuration() {
        let options = ShopperTokenOptions::default();

        let no_key = ShopperTokenIssuer::new(
            LightrailConfig::default().with_shared_secret("secret").into(),
        );
        assert!(matches!(
            no_key.generate_shopper_token("c", &options),
            Err(LightrailError::Config(_))
        ));

        let api_key = api_key_with(&json!({ "g": { "gui": "u" } }));
        let no_secret =
            ShopperTokenIssuer::new(LightrailConfig::default().with_api_key(api_key).into());
        assert!(matches!(
            no_secret.generate_shopper_token("c", &options),
            Err(LightrailError::Config(_))
        ));
    }

    #[test]
    fn test_undecodable_api_key() {
        let issuer = ShopperTokenIssuer::new(
            LightrailConfig::default()
                .with_api_key("not-a-token")
                .with_shared_secret("secret")
                .into(),
        );
        let err = issuer
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap_err();
        assert!(matches!(err, LightrailError::InvalidApiKey(_)));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_api_key_without_g_claim() {
        let issuer = ShopperTokenIssuer::new(
            LightrailConfig::default()
                .with_api_key(api_key_with(&json!({ "sub": "nobody" })))
                .with_shared_secret("secret")
                .into(),
        );
        let err = issuer
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_non_object_g_claim_is_invalid_api_key() {
        let issuer = ShopperTokenIssuer::new(
            LightrailConfig::default()
                .with_api_key(api_key_with(&json!({ "g": "not-an-object" })))
                .with_shared_secret("secret")
                .into(),
        );
        let err = issuer
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap_err();
        assert!(matches!(err, LightrailError::InvalidApiKey(_)), "{err:?}");
    }

    #[test]
    fn test_wrong_secret_fails_to_decode() {
        let token = issuer()
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap();
        assert!(matches!(
            decode_shopper_token(&token, "other"),
            Err(LightrailError::Token(_))
        ));
        assert!(decode_shopper_token(&token, "").unwrap_err().is_argument_error());
    }

    #[test]
    fn test_reconfiguration_applies_to_next_token() {
        let issuer = issuer();
        issuer_config(&issuer).update(ConfigOptions::default().shared_secret("rotated"));

        let token = issuer
            .generate_shopper_token("c", &ShopperTokenOptions::default())
            .unwrap();
        assert!(decode_shopper_token(&token, "secret").is_err());
        assert!(decode_shopper_token(&token, "rotated").is_ok());
    }

    fn issuer_config(issuer: &ShopperTokenIssuer) -> &SharedConfig {
        &issuer.config
    }
}
