//! OAuth2 client-credentials exchange with a signed JWT assertion (RFC 7523)
//!
//! The authenticator owns the client's only mutable auth state: the current
//! [`Session`], an access token paired with the `Authorization` header built
//! from it. Readers take a lock-free snapshot; a new session replaces the old
//! one in a single store, so the token and the header a request attaches can
//! never disagree.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use http::{HeaderValue, Method};
use openbank_http::HttpTransport;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::claims::AuthClaims;
use crate::consent::{self, ConsentLink};
use crate::error::Result;
use crate::identity::{ClientIdentity, TOKEN_PATH};
use crate::token::{AccessToken, TokenResponse};

/// `client_assertion_type` for JWT bearer client authentication
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// An access token and the header value derived from it
#[derive(Debug)]
pub struct Session {
    token: AccessToken,
    authorization: HeaderValue,
}

impl Session {
    /// # Errors
    ///
    /// See [`AccessToken::authorization_value`].
    pub fn new(token: AccessToken) -> Result<Self> {
        let authorization = token.authorization_value()?;
        Ok(Self {
            token,
            authorization,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// `Authorization: Bearer ...` value, flagged sensitive
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_valid_at(now)
    }
}

/// Ensures the client holds a valid access token
///
/// Cheap to call before every API request: a valid cached token returns
/// without touching the network or any lock. Concurrent callers that all find
/// the token stale queue on one exchange; the first performs it and the rest
/// reuse its result.
#[derive(Debug)]
pub struct Authenticator {
    identity: Arc<ClientIdentity>,
    transport: HttpTransport,
    session: ArcSwapOption<Session>,
    exchange: Mutex<()>,
}

impl Authenticator {
    pub fn new(identity: Arc<ClientIdentity>, transport: HttpTransport) -> Self {
        Self {
            identity,
            transport,
            session: ArcSwapOption::empty(),
            exchange: Mutex::new(()),
        }
    }

    pub fn identity(&self) -> &Arc<ClientIdentity> {
        &self.identity
    }

    /// Current session snapshot, valid or not
    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.session.load_full()
    }

    /// Header value of the current session, valid or not
    pub fn authorization_header(&self) -> Option<HeaderValue> {
        self.session
            .load()
            .as_ref()
            .map(|session| session.authorization().clone())
    }

    /// Token of the current session, valid or not
    pub fn access_token(&self) -> Option<AccessToken> {
        self.session
            .load()
            .as_ref()
            .map(|session| session.token().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.valid_session(Utc::now()).is_some()
    }

    /// Drop the current session so the next [`authenticate`](Self::authenticate) exchanges
    pub fn invalidate(&self) {
        self.session.store(None);
    }

    fn valid_session(&self, now: DateTime<Utc>) -> Option<Arc<Session>> {
        self.session
            .load_full()
            .filter(|session| session.is_valid_at(now))
    }

    /// Return a valid session, exchanging a fresh assertion only when needed
    ///
    /// # Errors
    ///
    /// - [`AuthError::Signing`](crate::AuthError::Signing) if the assertion cannot be signed
    /// - [`AuthError::Transport`](crate::AuthError::Transport) for network failures and
    ///   non-2xx token responses, with the provider's error body
    /// - [`AuthError::TokenResponse`](crate::AuthError::TokenResponse) for a 2xx response
    ///   without a usable token
    ///
    /// On any error the previous session, if any, is left in place.
    #[instrument(skip(self), fields(client_id = %self.identity.client_id()))]
    pub async fn authenticate(&self) -> Result<Arc<Session>> {
        if let Some(session) = self.valid_session(Utc::now()) {
            debug!("reusing cached access token");
            return Ok(session);
        }

        let _guard = self.exchange.lock().await;
        if let Some(session) = self.valid_session(Utc::now()) {
            debug!("access token refreshed by a concurrent caller");
            return Ok(session);
        }

        let session = match self.exchange().await {
            Ok(session) => Arc::new(session),
            Err(e) => {
                warn!(error = %e, "token exchange failed");
                return Err(e);
            }
        };
        self.session.store(Some(Arc::clone(&session)));
        info!(
            expires_at = ?session.token().claims_expiry(),
            "access token acquired"
        );
        Ok(session)
    }

    async fn exchange(&self) -> Result<Session> {
        let claims = AuthClaims::new(&self.identity, Utc::now());
        let assertion = self.identity.signer().sign(&claims)?;

        let response = self
            .transport
            .request(Method::POST, self.identity.account_url(), TOKEN_PATH)
            .form(&[
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
                ("client_id", self.identity.client_id()),
                ("grant_type", "client_credentials"),
            ])
            .execute::<TokenResponse>()
            .await?;

        let token = AccessToken::from_response(response.data, Utc::now())?;
        Session::new(token)
    }

    /// Build a consent link for `session_id` (or a fresh session)
    ///
    /// # Errors
    ///
    /// See [`consent::consent_link`].
    pub fn consent_link(&self, session_id: Option<&str>) -> Result<ConsentLink> {
        consent::consent_link(&self.identity, session_id, Utc::now())
    }
}
