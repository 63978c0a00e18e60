//! Transport error types and the provider's error body union

use std::fmt;

use http::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Longest accepted idempotency key, measured after trimming
pub const IDEMPOTENCY_KEY_MAX_LEN: usize = 72;

/// Raw bodies longer than this are cut when rendered in error messages
const RAW_DISPLAY_LIMIT: usize = 512;

/// Errors produced while building, sending or decoding a request
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connection, TLS, timeout)
    #[error("{method} {url}: request failed: {source}")]
    Request {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-2xx status
    #[error("{method} {url}: {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: ProviderError,
    },

    /// A successful response carried a body of the wrong shape
    #[error("{method} {url}: failed to decode response body: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request body serialization failed
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A path could not be resolved against the base URL
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Header value contained characters HTTP does not allow
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),

    /// Idempotency key longer than [`IDEMPOTENCY_KEY_MAX_LEN`]
    #[error("invalid idempotency key")]
    InvalidIdempotencyKey,
}

impl TransportError {
    /// HTTP status of a non-2xx response, if that is what failed
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded provider error body, if the provider sent one
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Error bodies returned by the provider
///
/// The token endpoint answers with OAuth2 errors, the resource API with its own
/// `message`/`request_id` object (transfer validation failures add `type`,
/// `validation_errors` and `reason`). Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// RFC 6749 §5.2 error response
    OAuth {
        error: String,
        error_description: Option<String>,
    },
    /// Resource API error object
    Api(ApiErrorBody),
    /// Body that matched no known shape, or no body at all
    Raw(String),
}

/// Error object returned by the resource API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub validation_errors: Vec<FieldError>,
    #[serde(default)]
    pub reason: Vec<FieldError>,
    #[serde(default)]
    pub transfer_error: Option<Value>,
}

/// A single field-level complaint inside [`ApiErrorBody`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub path: Vec<String>,
}

const API_ERROR_MEMBERS: [&str; 6] = [
    "message",
    "request_id",
    "type",
    "validation_errors",
    "reason",
    "transfer_error",
];

impl ProviderError {
    /// Decode an error body, falling back to [`ProviderError::Raw`] on anything unexpected
    pub fn from_body(body: &[u8]) -> Self {
        let raw = || Self::Raw(String::from_utf8_lossy(body).into_owned());

        let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) else {
            return raw();
        };

        if let Some(Value::String(error)) = object.get("error") {
            let error_description = object
                .get("error_description")
                .and_then(Value::as_str)
                .map(str::to_owned);
            return Self::OAuth {
                error: error.clone(),
                error_description,
            };
        }

        if API_ERROR_MEMBERS.iter().any(|m| object.contains_key(*m)) {
            return match serde_json::from_value::<ApiErrorBody>(Value::Object(object)) {
                Ok(api) => Self::Api(api),
                Err(_) => raw(),
            };
        }

        raw()
    }

    /// Provider request id, useful when contacting support
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api(api) => api.request_id.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OAuth {
                error,
                error_description: Some(description),
            } => write!(f, "{error}: {description}"),
            Self::OAuth { error, .. } => f.write_str(error),
            Self::Api(api) => {
                let summary = api
                    .message
                    .as_deref()
                    .or(api.kind.as_deref())
                    .unwrap_or("api error");
                f.write_str(summary)?;
                for field in api.validation_errors.iter().chain(&api.reason) {
                    write!(f, "; {} ({})", field.error, field.path.join("."))?;
                }
                if let Some(request_id) = &api.request_id {
                    write!(f, " (request {request_id:?})")?;
                }
                Ok(())
            }
            Self::Raw(body) if body.is_empty() => f.write_str("<empty body>"),
            Self::Raw(body) => {
                let mut cut = body.chars();
                let shown: String = cut.by_ref().take(RAW_DISPLAY_LIMIT).collect();
                f.write_str(&shown)?;
                if cut.next().is_some() {
                    f.write_str("...")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_oauth_error_body() {
        let body = br#"{"error":"invalid_client","error_description":"bad assertion"}"#;
        assert_eq!(
            ProviderError::from_body(body),
            ProviderError::OAuth {
                error: "invalid_client".into(),
                error_description: Some("bad assertion".into()),
            }
        );
    }

    #[test]
    fn test_transfer_validation_body() {
        let body = br#"{
            "type": "srn:error:validation",
            "request_id": "req-1",
            "validation_errors": [{"error": "must be positive", "path": ["amount"]}]
        }"#;
        let decoded = ProviderError::from_body(body);
        assert_eq!(decoded.request_id(), Some("req-1"));
        let ProviderError::Api(api) = &decoded else {
            panic!("expected api error, got {decoded:?}");
        };
        assert_eq!(api.kind.as_deref(), Some("srn:error:validation"));
        assert_eq!(api.validation_errors[0].path, vec!["amount".to_string()]);
        assert_eq!(
            decoded.to_string(),
            "srn:error:validation; must be positive (amount) (request \"req-1\")"
        );
    }

    #[test]
    fn test_unknown_shapes_fall_back_to_raw() {
        assert_eq!(
            ProviderError::from_body(b"<html>bad gateway</html>"),
            ProviderError::Raw("<html>bad gateway</html>".into())
        );
        assert_eq!(
            ProviderError::from_body(br#"{"unexpected": true}"#),
            ProviderError::Raw(r#"{"unexpected": true}"#.into())
        );
        // reason is a list of field errors; a bare string does not fit
        assert!(matches!(
            ProviderError::from_body(br#"{"reason": "nope"}"#),
            ProviderError::Raw(_)
        ));
    }

    #[test]
    fn test_raw_display_is_truncated() {
        let long = "x".repeat(RAW_DISPLAY_LIMIT + 10);
        let shown = ProviderError::Raw(long).to_string();
        assert_eq!(shown.len(), RAW_DISPLAY_LIMIT + 3);
        assert!(shown.ends_with("..."));
        assert_eq!(ProviderError::Raw(String::new()).to_string(), "<empty body>");
    }
}
