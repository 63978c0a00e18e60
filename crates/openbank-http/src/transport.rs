//! Request building and dispatch

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, trace, warn};
use url::Url;

use crate::error::{IDEMPOTENCY_KEY_MAX_LEN, ProviderError, Result, TransportError};

/// Header carrying the caller's idempotency key
pub const IDEMPOTENCY_HEADER: &str = "x-stone-idempotency-key";

/// User agent sent when the caller does not add a prefix
pub const DEFAULT_USER_AGENT: &str = concat!("openbank-rust/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

/// Settings for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Full `User-Agent` header value
    pub user_agent: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Prepend an application identifier to the default user agent
    pub fn with_user_agent_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim();
        if !prefix.is_empty() {
            self.user_agent = format!("{prefix} {DEFAULT_USER_AGENT}");
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Thin wrapper over a [`reqwest::Client`] shared by every outbound call
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from its settings
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    /// Start a request for `path` resolved against `base`
    ///
    /// `path` follows URL reference resolution, so an absolute path such as
    /// `/api/v1/accounts` replaces whatever path `base` carries.
    pub fn request(&self, method: Method, base: &Url, path: &str) -> OutboundRequest<'_> {
        let (url, error) = match base.join(path) {
            Ok(url) => (url, None),
            Err(e) => (
                base.clone(),
                Some(TransportError::InvalidUrl(format!("{base} + {path}: {e}"))),
            ),
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        OutboundRequest {
            transport: self,
            method,
            url,
            headers,
            query: Vec::new(),
            body: Body::Empty,
            error,
        }
    }
}

#[derive(Debug)]
enum Body {
    Empty,
    Json(Vec<u8>),
    Form(Vec<(String, String)>),
}

/// A request under construction
///
/// Builder methods never fail directly; the first error is remembered and
/// returned when the request is executed.
#[derive(Debug)]
#[must_use = "requests do nothing until executed"]
pub struct OutboundRequest<'a> {
    transport: &'a HttpTransport,
    method: Method,
    url: Url,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Body,
    error: Option<TransportError>,
}

/// A decoded 2xx response
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

struct RawResponse {
    method: Method,
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl<'a> OutboundRequest<'a> {
    /// Resolved request URL (query pairs added with [`query`](Self::query) are not included)
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn fail(mut self, error: TransportError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    /// Set a header, replacing any previous value
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(HeaderName::from_static(name), value);
                self
            }
            Err(_) => self.fail(TransportError::InvalidHeader(name)),
        }
    }

    /// Attach a prebuilt `Authorization` value
    pub fn bearer(mut self, authorization: HeaderValue) -> Self {
        self.headers.insert(AUTHORIZATION, authorization);
        self
    }

    /// Attach `x-stone-idempotency-key`
    ///
    /// The key is trimmed first. An empty key adds no header; a key longer
    /// than [`IDEMPOTENCY_KEY_MAX_LEN`] fails the request.
    pub fn idempotency_key(self, key: &str) -> Self {
        let key = key.trim();
        if key.is_empty() {
            return self;
        }
        if key.len() > IDEMPOTENCY_KEY_MAX_LEN {
            return self.fail(TransportError::InvalidIdempotencyKey);
        }
        self.header(IDEMPOTENCY_HEADER, key)
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                self.body = Body::Json(bytes);
                self
            }
            Err(e) => self.fail(TransportError::Encode(e)),
        }
    }

    /// Send `pairs` as an `application/x-www-form-urlencoded` body
    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        );
        self
    }

    /// Append query-string pairs
    pub fn query(mut self, pairs: &[(&str, &str)]) -> Self {
        self.query
            .extend(pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        self
    }

    /// Send the request and decode a JSON success body into `T`
    ///
    /// # Errors
    ///
    /// - [`TransportError::Request`] when no response arrives
    /// - [`TransportError::Status`] for non-2xx responses, with the decoded provider body
    /// - [`TransportError::Decode`] when a 2xx body does not match `T`
    /// - any error remembered while the request was being built
    pub async fn execute<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        let raw = self.dispatch().await?;
        let data = serde_json::from_slice(&raw.body).map_err(|source| TransportError::Decode {
            method: raw.method,
            url: raw.url,
            source,
        })?;
        Ok(ApiResponse {
            status: raw.status,
            headers: raw.headers,
            data,
        })
    }

    /// Send the request and discard the success body
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), minus body decoding.
    pub async fn execute_empty(self) -> Result<ApiResponse<()>> {
        let raw = self.dispatch().await?;
        Ok(ApiResponse {
            status: raw.status,
            headers: raw.headers,
            data: (),
        })
    }

    async fn dispatch(self) -> Result<RawResponse> {
        let span = tracing::debug_span!(
            "openbank.http",
            method = %self.method,
            url = %self.url,
            status = tracing::field::Empty,
        );
        let recorder = span.clone();

        async move {
            if let Some(error) = self.error {
                return Err(error);
            }

            let method = self.method;
            let url = self.url.to_string();

            let mut builder = self
                .transport
                .client
                .request(method.clone(), self.url)
                .headers(self.headers);
            if !self.query.is_empty() {
                builder = builder.query(&self.query);
            }
            builder = match self.body {
                Body::Empty => builder,
                Body::Json(bytes) => {
                    trace!(body = %String::from_utf8_lossy(&bytes), "request body");
                    builder
                        .header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                        .body(bytes)
                }
                Body::Form(pairs) => builder.form(&pairs),
            };

            debug!("sending request");
            let response = builder.send().await.map_err(|source| TransportError::Request {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;

            let status = response.status();
            recorder.record("status", status.as_u16());
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|source| TransportError::Request {
                    method: method.clone(),
                    url: url.clone(),
                    source,
                })?
                .to_vec();
            trace!(body = %String::from_utf8_lossy(&body), "response body");

            if !status.is_success() {
                let body = ProviderError::from_body(&body);
                warn!(%status, error = %body, "provider returned an error");
                return Err(TransportError::Status {
                    method,
                    url,
                    status,
                    body,
                });
            }

            Ok(RawResponse {
                method,
                url,
                status,
                headers,
                body,
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpTransport {
        HttpTransport::new(TransportConfig::default()).unwrap()
    }

    #[test]
    fn test_absolute_path_replaces_base_path() {
        let t = transport();
        let base = Url::parse("https://api.example.com/ignored/").unwrap();
        let req = t.request(Method::GET, &base, "/api/v1/accounts?paginate=true");
        assert_eq!(
            req.url().as_str(),
            "https://api.example.com/api/v1/accounts?paginate=true"
        );
    }

    #[test]
    fn test_idempotency_key_is_trimmed() {
        let t = transport();
        let base = Url::parse("https://api.example.com").unwrap();
        let req = t
            .request(Method::POST, &base, "/x")
            .idempotency_key("  abc  ");
        assert_eq!(req.headers.get(IDEMPOTENCY_HEADER).unwrap(), "abc");
        assert!(req.error.is_none());
    }

    #[test]
    fn test_blank_idempotency_key_adds_nothing() {
        let t = transport();
        let base = Url::parse("https://api.example.com").unwrap();
        let req = t.request(Method::POST, &base, "/x").idempotency_key("   ");
        assert!(req.headers.get(IDEMPOTENCY_HEADER).is_none());
        assert!(req.error.is_none());
    }

    #[test]
    fn test_idempotency_key_length_limit() {
        let t = transport();
        let base = Url::parse("https://api.example.com").unwrap();

        let at_limit = "k".repeat(IDEMPOTENCY_KEY_MAX_LEN);
        let req = t.request(Method::POST, &base, "/x").idempotency_key(&at_limit);
        assert!(req.error.is_none());

        let over = format!(" {}k ", at_limit);
        let req = t.request(Method::POST, &base, "/x").idempotency_key(&over);
        assert!(matches!(
            req.error,
            Some(TransportError::InvalidIdempotencyKey)
        ));
    }

    #[test]
    fn test_first_builder_error_wins() {
        let t = transport();
        let base = Url::parse("https://api.example.com").unwrap();
        let req = t
            .request(Method::POST, &base, "/x")
            .header("x-stone-verification-id", "bad\nvalue")
            .idempotency_key(&"k".repeat(100));
        assert!(matches!(
            req.error,
            Some(TransportError::InvalidHeader("x-stone-verification-id"))
        ));
    }

    #[test]
    fn test_user_agent_prefix() {
        let config = TransportConfig::default().with_user_agent_prefix("acme/2.0");
        assert_eq!(config.user_agent, format!("acme/2.0 {DEFAULT_USER_AGENT}"));
        let config = TransportConfig::default().with_user_agent_prefix("  ");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
