//! The client facade

use std::fmt;
use std::sync::Arc;

use openbank_auth::{Authenticator, ClientIdentity, ConsentLink, KeyCache, WebhookVerifier};
use openbank_http::{
    ApiResponse, HttpTransport, Method, OutboundRequest, StatusCode, TransportConfig,
    TransportError, Url,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::services::{
    Accounts, Institutions, PaymentInvoices, PaymentLinks, Pix, Topups, Transfers,
};

/// Async client for the Openbank API
///
/// Cheap to clone; clones share the session, the provider key cache and the
/// HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    transport: HttpTransport,
    auth: Authenticator,
    webhooks: WebhookVerifier,
    site_url: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = self.identity();
        f.debug_struct("Client")
            .field("client_id", &identity.client_id())
            .field("api_base_url", &identity.api_base_url().as_str())
            .field("authenticated", &self.inner.auth.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Validate `config` and build a client
    ///
    /// No network traffic happens here; the first call authenticates.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for malformed URLs and [`Error::Auth`] for an empty
    /// client id or a private key that does not parse.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let account_url = config.resolved_account_url()?;
        let api_base_url = config.resolved_api_base_url()?;
        let site_url = config.resolved_site_url()?;

        let mut identity = ClientIdentity::new(
            config.client_id.clone(),
            config.private_key_pem(),
            account_url,
            api_base_url.clone(),
        )?;
        if let Some(redirect) = config.consent_redirect_url.as_deref() {
            identity = identity.with_consent_redirect_url(redirect);
        }
        let identity = Arc::new(identity);

        let mut transport_config = TransportConfig::default().with_timeout(config.timeout());
        if let Some(prefix) = config.user_agent.as_deref() {
            transport_config = transport_config.with_user_agent_prefix(prefix);
        }
        let transport = HttpTransport::new(transport_config)?;

        let keys = Arc::new(KeyCache::new(transport.clone(), api_base_url));
        let webhooks = WebhookVerifier::new(Arc::clone(&identity), keys);
        let auth = Authenticator::new(Arc::clone(&identity), transport.clone());

        info!(
            client_id = %identity.client_id(),
            environment = ?config.environment,
            "openbank client configured"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                transport,
                auth,
                webhooks,
                site_url,
            }),
        })
    }

    pub fn identity(&self) -> &Arc<ClientIdentity> {
        self.inner.auth.identity()
    }

    /// Token state, for callers that need to inspect or drop the session
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.auth
    }

    /// Key cache used to verify webhook signatures
    pub fn provider_keys(&self) -> &Arc<KeyCache> {
        self.inner.webhooks.keys()
    }

    /// Web banking site of the selected environment
    pub fn site_url(&self) -> &Url {
        &self.inner.site_url
    }

    /// Make sure a valid access token is held, exchanging a new one if needed
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the token exchange fails.
    pub async fn authenticate(&self) -> Result<()> {
        self.inner.auth.authenticate().await?;
        Ok(())
    }

    /// Build a consent link for `session_id`, or a fresh session id when absent
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] when the consent claims cannot be signed.
    pub fn consent_link(&self, session_id: Option<&str>) -> Result<ConsentLink> {
        Ok(self.inner.auth.consent_link(session_id)?)
    }

    /// Verify an inbound webhook request body and return the signed payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::Webhook`] when the body cannot be decrypted, is not
    /// signed by a provider key, or its signature does not check out.
    pub async fn verify_webhook(&self, body: &[u8]) -> Result<Vec<u8>> {
        Ok(self.inner.webhooks.verify_body(body).await?)
    }

    /// Like [`verify_webhook`](Self::verify_webhook), decoding the payload as JSON
    ///
    /// # Errors
    ///
    /// As [`verify_webhook`](Self::verify_webhook), plus a payload that does
    /// not decode into `T`.
    pub async fn verify_webhook_json<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        Ok(self.inner.webhooks.verify_json(body).await?)
    }

    /// Verify an already extracted JWE compact string
    ///
    /// # Errors
    ///
    /// Same as [`verify_webhook`](Self::verify_webhook).
    pub async fn decrypt_webhook(&self, encrypted: &str) -> Result<Vec<u8>> {
        Ok(self.inner.webhooks.verify(encrypted).await?)
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn institutions(&self) -> Institutions<'_> {
        Institutions::new(self)
    }

    pub fn transfers(&self) -> Transfers<'_> {
        Transfers::new(self)
    }

    pub fn pix(&self) -> Pix<'_> {
        Pix::new(self)
    }

    pub fn payment_invoices(&self) -> PaymentInvoices<'_> {
        PaymentInvoices::new(self)
    }

    pub fn payment_links(&self) -> PaymentLinks<'_> {
        PaymentLinks::new(self)
    }

    pub fn topups(&self) -> Topups<'_> {
        Topups::new(self)
    }

    /// Authenticated request against the API base URL
    pub(crate) async fn request(&self, method: Method, path: &str) -> Result<OutboundRequest<'_>> {
        let session = self.inner.auth.authenticate().await?;
        let base = self.identity().api_base_url();
        Ok(self
            .inner
            .transport
            .request(method, base, path)
            .bearer(session.authorization().clone()))
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: OutboundRequest<'_>) -> Result<T> {
        let response = self.settle(request.execute::<T>().await)?;
        Ok(response.into_data())
    }

    pub(crate) async fn send_empty(&self, request: OutboundRequest<'_>) -> Result<()> {
        self.settle(request.execute_empty().await)?;
        Ok(())
    }

    /// A 401 from the API means the provider no longer honours the token
    fn settle<T>(
        &self,
        result: std::result::Result<ApiResponse<T>, TransportError>,
    ) -> Result<ApiResponse<T>> {
        if let Err(err) = &result
            && err.status() == Some(StatusCode::UNAUTHORIZED)
        {
            warn!(error = %err, "access token rejected, dropping session");
            self.inner.auth.invalidate();
        }
        result.map_err(Error::from)
    }
}
