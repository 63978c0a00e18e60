//! Access tokens issued by the token endpoint

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::error::{AuthError, Result};
use crate::jose::b64_decode;

/// A token must stay valid at least this long past "now" to be reused
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Token endpoint response (RFC 6749 §5.1 plus Keycloak extras)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry, preferred over `expires_in` when both are sent
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default)]
    pub refresh_expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub session_state: Option<String>,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// An access token plus what the client needs to decide whether to reuse it
///
/// Freshness is judged from the `exp` claim embedded in the token itself,
/// not from the response's advertised lifetime.
#[derive(Clone)]
pub struct AccessToken {
    secret: SecretString,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
    claims_exp: Option<i64>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("claims_exp", &self.claims_exp)
            .finish()
    }
}

/// `exp` of a three-part token, or `None` for anything malformed
fn embedded_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let bytes = b64_decode("payload", payload).ok()?;
    serde_json::from_slice::<ExpiryClaim>(&bytes).ok()?.exp
}

fn normalize_token_type(token_type: &str) -> String {
    if token_type.is_empty() || token_type.eq_ignore_ascii_case("bearer") {
        "Bearer".to_string()
    } else {
        token_type.to_string()
    }
}

impl AccessToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>, token_type: &str, expires_at: Option<DateTime<Utc>>) -> Self {
        let token = token.into();
        Self {
            claims_exp: embedded_expiry(&token),
            secret: SecretString::new(token),
            token_type: normalize_token_type(token_type),
            expires_at,
        }
    }

    /// Build a token from an endpoint response received at `received_at`
    ///
    /// # Errors
    ///
    /// [`AuthError::TokenResponse`] when `access_token` is empty.
    pub fn from_response(response: TokenResponse, received_at: DateTime<Utc>) -> Result<Self> {
        let token = response.access_token.expose_secret();
        if token.trim().is_empty() {
            return Err(AuthError::TokenResponse("empty access_token".into()));
        }
        let expires_at = response.expiry.or_else(|| {
            response
                .expires_in
                .and_then(TimeDelta::try_seconds)
                .map(|lifetime| received_at + lifetime)
        });
        let token = Self::new(token.clone(), &response.token_type, expires_at);
        if token.claims_exp.is_none() {
            warn!("access token carries no readable exp claim and will not be reused");
        }
        Ok(token)
    }

    /// Whether the token can still be sent at `now`
    ///
    /// True iff the token is non-empty, has three segments and its embedded
    /// `exp` is at least [`EXPIRY_MARGIN_SECS`] past `now`. Sub-second
    /// precision of `now` counts.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.secret.expose_secret().is_empty() {
            return false;
        }
        let deadline = now.checked_add_signed(TimeDelta::seconds(EXPIRY_MARGIN_SECS));
        match (self.claims_expiry(), deadline) {
            (Some(expiry), Some(deadline)) => expiry >= deadline,
            _ => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Expiry advertised by the token endpoint
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// `exp` claim read from the token itself
    pub fn claims_expiry(&self) -> Option<DateTime<Utc>> {
        self.claims_exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// `Authorization` header value, marked sensitive
    ///
    /// # Errors
    ///
    /// [`AuthError::TokenResponse`] if the token contains bytes not allowed in a header.
    pub fn authorization_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("{} {}", self.token_type, self.secret()))
            .map_err(|_| {
                AuthError::TokenResponse("access token is not a valid header value".into())
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}
