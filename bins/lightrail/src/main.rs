//! lightrail: shopper tokens and webhook signatures from the command line.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lightrail_client::{
    decode_shopper_token, ConfigOptions, LightrailClient, LightrailError, ShopperTokenOptions,
};
use serde_json::{json, Map, Value};
use std::process::ExitCode;
use tracing::debug;

mod output;

use output::{Format, Status};

/// Exit code when a webhook signature does not match
const EXIT_INVALID_SIGNATURE: u8 = 1;

/// Exit code for usage, argument and configuration errors
const EXIT_ERROR: u8 = 2;

/// Lightrail shopper token and webhook signature tool
#[derive(Parser)]
#[command(name = "lightrail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a shopper token for a contact
    ShopperToken {
        /// Contact id (may be empty)
        contact_id: String,

        /// Token lifetime in seconds
        #[arg(long)]
        validity: Option<u64>,

        /// Metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,

        /// API key used to identify the merchant
        #[arg(long, env = "LIGHTRAIL_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Secret used to sign the token
        #[arg(long, env = "LIGHTRAIL_SHARED_SECRET", hide_env_values = true)]
        shared_secret: Option<String>,
    },

    /// Verify a shopper token and print its claims
    DecodeToken {
        /// Token to decode
        token: String,

        /// Secret the token was signed with
        #[arg(long, env = "LIGHTRAIL_SHARED_SECRET", hide_env_values = true)]
        shared_secret: Option<String>,
    },

    /// Compute the signature for a webhook body
    SignWebhook {
        /// Body text, or @path to read it from a file
        payload: String,

        /// Webhook secret
        #[arg(long, env = "LIGHTRAIL_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Check a webhook signature header against a body
    VerifyWebhook {
        /// Signature header value (comma-separated candidates)
        signature: String,

        /// Body text, or @path to read it from a file
        payload: String,

        /// Webhook secret
        #[arg(long, env = "LIGHTRAIL_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    fn name(&self) -> &'static str {
        match self {
            Self::ShopperToken { .. } => "shopper-token",
            Self::DecodeToken { .. } => "decode-token",
            Self::SignWebhook { .. } => "sign-webhook",
            Self::VerifyWebhook { .. } => "verify-webhook",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("lightrail_client=debug,lightrail=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match run(cli.command, cli.format) {
        Ok(code) => code,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(command: Commands, format: Format) -> anyhow::Result<ExitCode> {
    debug!(command = command.name(), ?format, "Running command");
    let client = LightrailClient::default();

    match command {
        Commands::ShopperToken {
            contact_id,
            validity,
            metadata,
            api_key,
            shared_secret,
        } => {
            client.configure(ConfigOptions {
                api_key,
                shared_secret,
                webhook_secret: None,
            });

            let options = ShopperTokenOptions {
                validity_in_seconds: validity,
                metadata: metadata.as_deref().map(parse_metadata).transpose()?,
            };

            let token = client
                .shopper_tokens()
                .generate_shopper_token(&contact_id, &options)?;

            match format {
                Format::Json => println!("{}", json!({ "token": token })),
                Format::Text => println!("{token}"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::DecodeToken {
            token,
            shared_secret,
        } => {
            let secret = shared_secret.context("shared secret is required to verify the token")?;
            let claims = decode_shopper_token(&token, &secret)?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&claims)?),
                Format::Text => {
                    Status::header("Shopper token");
                    println!("Contact:  {:?}", claims.contact_id().unwrap_or_default());
                    println!("Merchant: {}", claims.merchant_id().unwrap_or(&Value::Null));
                    println!("User:     {}", claims.user_id().unwrap_or(&Value::Null));
                    println!("Issuer:   {}", claims.iss);
                    println!("Issued:   {}", claims.iat);
                    println!("Expires:  {} (+{}s)", claims.exp, claims.validity_seconds());
                    if let Some(metadata) = &claims.metadata {
                        println!("Metadata: {}", Value::Object(metadata.clone()));
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::SignWebhook { payload, secret } => {
            let body = read_payload(&payload)?;
            let signature = client.webhooks().sign(&body, secret.as_deref())?;

            match format {
                Format::Json => println!("{}", json!({ "signature": signature })),
                Format::Text => println!("{signature}"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::VerifyWebhook {
            signature,
            payload,
            secret,
        } => {
            let body = read_payload(&payload)?;
            let valid = match client
                .webhooks()
                .verify_signature(&signature, secret.as_deref(), &body)
            {
                Ok(valid) => valid,
                Err(LightrailError::Argument(msg)) => bail!("invalid request: {msg}"),
                Err(e) => return Err(e.into()),
            };

            match format {
                Format::Json => println!("{}", json!({ "valid": valid })),
                Format::Text if valid => Status::success("Signature is valid"),
                Format::Text => Status::error("Signature does not match"),
            }

            if valid {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_INVALID_SIGNATURE))
            }
        }
    }
}

/// Read a payload argument; `@path` reads the file verbatim
fn read_payload(arg: &str) -> anyhow::Result<Vec<u8>> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let body = std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
            debug!(path, bytes = body.len(), "Read payload from file");
            Ok(body)
        }
        None => Ok(arg.as_bytes().to_vec()),
    }
}

fn parse_metadata(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("metadata is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("metadata must be a JSON object, got {other}"),
    }
}
