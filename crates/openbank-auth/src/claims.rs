//! Claim sets for client assertions and consent links

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::ClientIdentity;

/// Keycloak realm the provider authenticates clients in
pub const REALM: &str = "stone_bank";

/// Fixed audience of consent tokens
pub const CONSENT_AUDIENCE: &str = "accounts-hubid@openbank.stone.com.br";

/// Lifetime of both assertion kinds, in seconds
pub const CLAIMS_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Client assertion claims (RFC 7523 §3)
///
/// Built fresh for every exchange; `jti` is a new UUID each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub aud: String,
    pub client_id: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
    pub nbf: i64,
    pub realm: String,
    pub sub: String,
}

impl AuthClaims {
    pub fn new(identity: &ClientIdentity, now: DateTime<Utc>) -> Self {
        let client_id = identity.client_id().to_string();
        Self {
            aud: identity.realm_audience(),
            exp: now.timestamp() + CLAIMS_LIFETIME_SECS,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            realm: REALM.to_string(),
            iss: client_id.clone(),
            sub: client_id.clone(),
            client_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub client_session: String,
}

/// Consent token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentClaims {
    pub aud: String,
    pub client_id: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    /// Equal to `session_metadata.client_session`
    pub jti: String,
    pub nbf: i64,
    pub redirect_uri: String,
    pub session_metadata: SessionMetadata,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ConsentClaims {
    /// Build consent claims for `session_id`, or for a fresh random session
    /// when it is absent or blank
    pub fn new(identity: &ClientIdentity, session_id: Option<&str>, now: DateTime<Utc>) -> Self {
        let session = match session_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        Self {
            aud: CONSENT_AUDIENCE.to_string(),
            client_id: identity.client_id().to_string(),
            exp: now.timestamp() + CLAIMS_LIFETIME_SECS,
            iat: now.timestamp(),
            iss: identity.client_id().to_string(),
            jti: session.clone(),
            nbf: now.timestamp(),
            redirect_uri: identity
                .consent_redirect_url()
                .unwrap_or_default()
                .to_string(),
            session_metadata: SessionMetadata {
                client_session: session,
            },
            kind: "consent".to_string(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_metadata.client_session
    }
}
