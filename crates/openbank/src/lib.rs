//! # openbank
//!
//! Typed async client for the Stone Openbank API.
//!
//! [`Client`] owns the client-credentials session and attaches a valid bearer
//! token to every resource call, exchanging a new one only when the cached
//! token is about to expire. Inbound webhooks are decrypted and their provider
//! signature verified with [`Client::verify_webhook`].
//!
//! ```rust,no_run
//! use openbank::{Client, ClientConfig};
//!
//! # async fn run() -> Result<(), openbank::Error> {
//! let config = ClientConfig::from_env()?;
//! let client = Client::new(config)?;
//!
//! for account in client.accounts().list().await? {
//!     let balance = client.accounts().balance(&account.id).await?;
//!     println!("{} {}", account.account_code, balance.balance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environments
//!
//! [`Environment::Production`] is the default; [`ClientConfigBuilder::sandbox`]
//! or `STONE_SANDBOX=1` selects the sandbox hosts. Any host can be overridden,
//! which is how the test suite points the client at a mock server.

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, Environment};
pub use error::{Error, Result};

pub use openbank_auth::{ConsentLink, WebhookError};
pub use openbank_http::ProviderError;
