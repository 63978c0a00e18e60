//! Per-client identity: client id, RSA key pair and provider base URLs

use std::fmt;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use url::Url;

use crate::claims::REALM;
use crate::error::{AuthError, Result};
use crate::signer::ClaimsSigner;

/// Token endpoint path, resolved against the account URL
pub const TOKEN_PATH: &str = "/auth/realms/stone_bank/protocol/openid-connect/token";

/// Key discovery path, resolved against the API base URL
pub const DISCOVERY_PATH: &str = "/api/v1/discovery/keys";

/// Immutable client configuration shared by the authenticator, consent
/// links and the webhook verifier
///
/// The private key is parsed once here, so a malformed key surfaces as a
/// configuration error at construction and never during an exchange.
pub struct ClientIdentity {
    client_id: String,
    private_key: RsaPrivateKey,
    signer: ClaimsSigner,
    account_url: Url,
    api_base_url: Url,
    consent_redirect_url: Option<String>,
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("private_key", &"[REDACTED]")
            .field("account_url", &self.account_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("consent_redirect_url", &self.consent_redirect_url)
            .finish()
    }
}

fn check_base_url(name: &str, url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(AuthError::Configuration(format!(
            "{name} must be an absolute http(s) URL, got {url}"
        ))),
    }
}

/// Parse an RSA private key from PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM
///
/// # Errors
///
/// [`AuthError::Configuration`] when the PEM holds neither.
pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    let pem = pem.trim();
    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|_| {
            AuthError::Configuration(
                "private key is not an RSA key in PKCS#1 or PKCS#8 PEM format".into(),
            )
        })
}

impl ClientIdentity {
    /// Build an identity from a PEM-encoded RSA private key
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] for an empty client id, a key that is not
    /// RSA PEM, or base URLs that are not absolute http(s) URLs.
    pub fn new(
        client_id: impl Into<String>,
        private_key_pem: &str,
        account_url: Url,
        api_base_url: Url,
    ) -> Result<Self> {
        Self::from_key(
            client_id,
            parse_private_key(private_key_pem)?,
            account_url,
            api_base_url,
        )
    }

    /// Build an identity from an already parsed key
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), minus PEM parsing.
    pub fn from_key(
        client_id: impl Into<String>,
        private_key: RsaPrivateKey,
        account_url: Url,
        api_base_url: Url,
    ) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(AuthError::Configuration("client id is empty".into()));
        }
        check_base_url("account url", &account_url)?;
        check_base_url("api base url", &api_base_url)?;

        Ok(Self {
            signer: ClaimsSigner::new(&private_key)?,
            client_id,
            private_key,
            account_url,
            api_base_url,
            consent_redirect_url: None,
        })
    }

    /// Redirect target embedded in consent links
    pub fn with_consent_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.consent_redirect_url = Some(url.into());
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn account_url(&self) -> &Url {
        &self.account_url
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn consent_redirect_url(&self) -> Option<&str> {
        self.consent_redirect_url.as_deref()
    }

    /// Public half of the client key, the key webhooks are encrypted to
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn signer(&self) -> &ClaimsSigner {
        &self.signer
    }

    /// `aud` of client assertions
    pub fn realm_audience(&self) -> String {
        format!(
            "{}/auth/realms/{REALM}",
            self.account_url.as_str().trim_end_matches('/')
        )
    }

    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the account URL cannot be a base.
    pub fn token_endpoint(&self) -> Result<Url> {
        self.account_url
            .join(TOKEN_PATH)
            .map_err(|e| AuthError::Configuration(format!("token endpoint: {e}")))
    }

    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the API base URL cannot be a base.
    pub fn discovery_endpoint(&self) -> Result<Url> {
        self.api_base_url
            .join(DISCOVERY_PATH)
            .map_err(|e| AuthError::Configuration(format!("discovery endpoint: {e}")))
    }
}
