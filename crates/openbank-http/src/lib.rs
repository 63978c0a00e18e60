//! # openbank-http
//!
//! HTTP plumbing shared by the Stone Openbank client crates.
//!
//! - [`HttpTransport`] wraps a pooled [`reqwest::Client`] with the user agent,
//!   timeout and redirect policy every call uses.
//! - [`OutboundRequest`] builds a single call: path resolution against a base
//!   URL, JSON or form bodies, standard headers, bearer credential and the
//!   `x-stone-idempotency-key` header.
//! - [`TransportError`] carries method, URL, status and the decoded
//!   [`ProviderError`] so callers can log or alert on failures.
//!
//! ```rust,no_run
//! # use openbank_http::{HttpTransport, TransportConfig};
//! # async fn run() -> Result<(), openbank_http::TransportError> {
//! let transport = HttpTransport::new(TransportConfig::default())?;
//! let base = url::Url::parse("https://sandbox-api.openbank.stone.com.br").unwrap();
//! let keys: serde_json::Value = transport
//!     .request(http::Method::GET, &base, "/api/v1/discovery/keys")
//!     .execute()
//!     .await?
//!     .into_data();
//! # let _ = keys;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod transport;

pub use error::{
    ApiErrorBody, FieldError, IDEMPOTENCY_KEY_MAX_LEN, ProviderError, Result, TransportError,
};
pub use transport::{
    ApiResponse, DEFAULT_USER_AGENT, HttpTransport, IDEMPOTENCY_HEADER, OutboundRequest,
    TransportConfig,
};

pub use http::{HeaderValue, Method, StatusCode};
pub use url::Url;
