//! # openbank-auth
//!
//! Authentication and secure webhook handling for the Stone Openbank API.
//!
//! ## Client credentials
//!
//! The provider authenticates clients with the OAuth 2.0 client-credentials
//! grant and a self-signed JWT assertion (RFC 7523). [`Authenticator`] signs a
//! fresh assertion, exchanges it for an access token and caches the result;
//! calling [`Authenticator::authenticate`] before every request costs nothing
//! while the cached token has more than 30 seconds left.
//!
//! ## Webhooks
//!
//! Webhooks are JWE-encrypted to the client's key and carry a JWS signed by
//! the provider. [`WebhookVerifier`] decrypts, checks that there is exactly
//! one signature, resolves its key through [`KeyCache`] (refreshing from the
//! discovery endpoint on a miss) and verifies it before returning the payload.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use openbank_auth::{Authenticator, ClientIdentity, KeyCache, WebhookVerifier};
//! use openbank_http::{HttpTransport, TransportConfig};
//! use url::Url;
//!
//! # async fn run(pem: &str, body: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Arc::new(ClientIdentity::new(
//!     "my-client-id",
//!     pem,
//!     Url::parse("https://sandbox-accounts.openbank.stone.com.br")?,
//!     Url::parse("https://sandbox-api.openbank.stone.com.br")?,
//! )?);
//! let transport = HttpTransport::new(TransportConfig::default())?;
//!
//! let auth = Authenticator::new(Arc::clone(&identity), transport.clone());
//! let session = auth.authenticate().await?;
//! # let _ = session;
//!
//! let keys = Arc::new(KeyCache::new(transport, identity.api_base_url().clone()));
//! let verifier = WebhookVerifier::new(identity, keys);
//! let payload = verifier.verify_body(body).await?;
//! # let _ = payload;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `test-utils` - fixture keys and helpers that build provider-style webhooks

pub mod authenticator;
pub mod claims;
pub mod consent;
pub mod error;
pub mod identity;
pub mod jose;
pub mod keys;
pub mod signer;
pub mod token;
pub mod webhook;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use authenticator::{Authenticator, CLIENT_ASSERTION_TYPE, Session};
pub use claims::{AuthClaims, ConsentClaims, SessionMetadata};
pub use consent::ConsentLink;
pub use error::{AuthError, JoseError, KeyCacheError, Result, WebhookError};
pub use identity::{ClientIdentity, DISCOVERY_PATH, TOKEN_PATH, parse_private_key};
pub use jose::{Jwk, JwkSet};
pub use keys::KeyCache;
pub use signer::ClaimsSigner;
pub use token::{AccessToken, EXPIRY_MARGIN_SECS, TokenResponse};
pub use webhook::WebhookVerifier;
