//! Error types for authentication, key discovery and webhook verification

use openbank_http::TransportError;
use thiserror::Error;

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication and client-identity errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad or missing private key, malformed base URL, empty client id
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Claim set could not be signed
    #[error("failed to sign claims: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token endpoint unreachable or answered with a non-2xx status
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Token endpoint answered 2xx without a usable token
    #[error("unusable token response: {0}")]
    TokenResponse(String),
}

/// Key discovery failures
#[derive(Debug, Error)]
pub enum KeyCacheError {
    /// The discovery endpoint could not be fetched or decoded
    #[error("failed to refresh provider keys: {0}")]
    Refresh(#[from] TransportError),

    /// No key with this id, even after a refresh
    #[error("no provider key with id {kid:?}")]
    KeyNotFound { kid: String },
}

/// Low-level JOSE parsing, decryption and signature failures
#[derive(Debug, Error)]
pub enum JoseError {
    /// Wrong number of segments, missing members, bad lengths
    #[error("malformed {0}")]
    Format(String),

    #[error("invalid base64url in {0}")]
    Base64(&'static str),

    #[error("invalid header: {0}")]
    Header(#[from] serde_json::Error),

    #[error("unsupported algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    /// The content encryption key could not be recovered
    #[error("key unwrap failed")]
    KeyUnwrap,

    /// Authenticated decryption rejected the ciphertext
    #[error("content decryption failed")]
    Decryption,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("signature mismatch")]
    BadSignature,

    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The signature algorithm does not fit the key, or differs from the
    /// algorithm the key is pinned to
    #[error("algorithm {alg:?} cannot be used with this key: {reason}")]
    KeyMismatch { alg: String, reason: String },
}

/// Webhook verification failures
///
/// Every variant is terminal. A verifier never yields a payload after any of
/// them.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Inbound body is neither `{"encrypted_body": "..."}` nor a bare JWE
    #[error("malformed webhook body: {0}")]
    Envelope(String),

    /// Envelope malformed, encrypted to another key, or tampered
    #[error("webhook decrypt failed: {0}")]
    Decrypt(#[source] JoseError),

    /// Decrypted content is not a JWS
    #[error("webhook parse failed: {0}")]
    Parse(#[source] JoseError),

    /// Zero or several signatures
    #[error("unsupported webhook: expected exactly one signature, found {count}")]
    UnsupportedSignature { count: usize },

    /// The signing key id is unknown to the discovery endpoint
    #[error("unknown webhook signing key {kid:?}")]
    KeyNotFound { kid: String },

    /// Discovery endpoint failed while resolving the signing key
    #[error("failed to refresh provider keys: {0}")]
    KeyRefresh(#[source] TransportError),

    /// The provider published a key this client cannot use (unknown key
    /// type or curve, malformed parameters)
    #[error("unusable webhook signing key {kid:?}: {source}")]
    UnsupportedKey {
        kid: String,
        #[source]
        source: JoseError,
    },

    /// Signature does not match the payload
    #[error("webhook signature verification failed: {0}")]
    SignatureInvalid(#[source] JoseError),
}

impl WebhookError {
    /// Whether the failure points at forged or corrupted content rather than
    /// a provider-side or configuration problem
    pub fn is_security_incident(&self) -> bool {
        matches!(self, Self::SignatureInvalid(_) | Self::Decrypt(_))
    }
}

impl From<KeyCacheError> for WebhookError {
    fn from(err: KeyCacheError) -> Self {
        match err {
            KeyCacheError::Refresh(source) => Self::KeyRefresh(source),
            KeyCacheError::KeyNotFound { kid } => Self::KeyNotFound { kid },
        }
    }
}
