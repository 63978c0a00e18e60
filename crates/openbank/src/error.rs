//! Client-level error type

use openbank_auth::{AuthError, WebhookError};
use openbank_http::{ProviderError, StatusCode, TransportError};
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a [`Client`](crate::Client) call can fail with
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration, reported once at construction
    #[error("configuration error: {0}")]
    Config(String),

    /// Token exchange or claim signing failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A resource call failed on the wire or with a non-2xx status
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An inbound webhook was rejected
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// Request input rejected before anything was sent
    #[error("invalid request: {0}")]
    Validation(String),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) | Self::Auth(AuthError::Transport(e)) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the failed call, from the token endpoint or the API
    pub fn status(&self) -> Option<StatusCode> {
        self.transport().and_then(TransportError::status)
    }

    /// Decoded error body the provider answered with
    pub fn provider_error(&self) -> Option<&ProviderError> {
        self.transport().and_then(TransportError::provider_error)
    }

    /// `request_id` the provider attached to its error, for support tickets
    pub fn request_id(&self) -> Option<&str> {
        self.provider_error().and_then(ProviderError::request_id)
    }
}

impl From<openbank_auth::KeyCacheError> for Error {
    fn from(err: openbank_auth::KeyCacheError) -> Self {
        Self::Webhook(err.into())
    }
}
