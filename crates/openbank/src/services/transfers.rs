use openbank_http::Method;
use tracing::instrument;

use super::segment;
use crate::client::Client;
use crate::error::Result;
use crate::types::{Page, Transfer, TransferInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Internal,
    External,
}

impl Kind {
    const fn collection(self) -> &'static str {
        match self {
            Self::Internal => "internal_transfers",
            Self::External => "external_transfers",
        }
    }
}

/// Internal and external (TED) transfers
#[derive(Debug, Clone, Copy)]
pub struct Transfers<'a> {
    client: &'a Client,
}

impl<'a> Transfers<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Make a transfer
    ///
    /// The transfer is external when the target names an institution code.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for input that
    /// [`TransferInput::validate`] rejects, otherwise the authentication or
    /// transport error of the call.
    #[instrument(skip_all, fields(account_id = %input.account_id, external = input.is_external()))]
    pub async fn transfer(&self, input: &TransferInput, idempotency_key: &str) -> Result<Transfer> {
        self.submit("/api/v1", input, idempotency_key).await
    }

    /// Simulate a transfer without moving money
    ///
    /// # Errors
    ///
    /// Same as [`transfer`](Self::transfer).
    #[instrument(skip_all, fields(account_id = %input.account_id, external = input.is_external()))]
    pub async fn dry_run(&self, input: &TransferInput, idempotency_key: &str) -> Result<Transfer> {
        self.submit("/api/v1/dry_run", input, idempotency_key).await
    }

    async fn submit(
        &self,
        prefix: &str,
        input: &TransferInput,
        idempotency_key: &str,
    ) -> Result<Transfer> {
        input.validate()?;
        let kind = if input.is_external() {
            Kind::External
        } else {
            Kind::Internal
        };
        let path = format!("{prefix}/{}", kind.collection());
        let request = self
            .client
            .request(Method::POST, &path)
            .await?
            .idempotency_key(idempotency_key)
            .json(input);
        self.client.send(request).await
    }

    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank account id,
    /// otherwise the authentication or transport error of the call.
    pub async fn list_internal(&self, account_id: &str) -> Result<Vec<Transfer>> {
        self.list(Kind::Internal, account_id).await
    }

    /// # Errors
    ///
    /// Same as [`list_internal`](Self::list_internal).
    pub async fn list_external(&self, account_id: &str) -> Result<Vec<Transfer>> {
        self.list(Kind::External, account_id).await
    }

    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank id,
    /// otherwise the authentication or transport error of the call.
    pub async fn get_internal(&self, id: &str) -> Result<Transfer> {
        self.get(Kind::Internal, id).await
    }

    /// # Errors
    ///
    /// Same as [`get_internal`](Self::get_internal).
    pub async fn get_external(&self, id: &str) -> Result<Transfer> {
        self.get(Kind::External, id).await
    }

    /// Cancel a scheduled internal transfer
    ///
    /// # Errors
    ///
    /// Same as [`get_internal`](Self::get_internal).
    pub async fn cancel_internal(&self, id: &str) -> Result<()> {
        self.cancel(Kind::Internal, id).await
    }

    /// Cancel a scheduled external transfer
    ///
    /// # Errors
    ///
    /// Same as [`get_internal`](Self::get_internal).
    pub async fn cancel_external(&self, id: &str) -> Result<()> {
        self.cancel(Kind::External, id).await
    }

    #[instrument(skip(self))]
    async fn list(&self, kind: Kind, account_id: &str) -> Result<Vec<Transfer>> {
        let account_id = super::required("account_id", account_id)?;
        let path = format!("/api/v1/{}", kind.collection());
        let request = self
            .client
            .request(Method::GET, &path)
            .await?
            .query(&[("account_id", account_id)]);
        let page: Page<Transfer> = self.client.send(request).await?;
        Ok(page.data)
    }

    #[instrument(skip(self))]
    async fn get(&self, kind: Kind, id: &str) -> Result<Transfer> {
        let path = format!("/api/v1/{}/{}", kind.collection(), segment("transfer id", id)?);
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    #[instrument(skip(self))]
    async fn cancel(&self, kind: Kind, id: &str) -> Result<()> {
        let path = format!(
            "/api/v1/{}/{}/cancel",
            kind.collection(),
            segment("transfer id", id)?
        );
        let request = self.client.request(Method::DELETE, &path).await?;
        self.client.send_empty(request).await
    }
}
