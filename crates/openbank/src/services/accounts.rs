use openbank_http::Method;
use tracing::instrument;

use super::segment;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{Account, Balance, Fee, Page, Statement};

/// Payment accounts, balances, statements and fees
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a Client,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Fails with [`Error::Validation`] for a blank id, otherwise with the
    /// authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Account> {
        let path = format!("/api/v1/accounts/{}", segment("account id", id)?);
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// Accounts the authenticated client can operate on
    ///
    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Account>> {
        let request = self
            .client
            .request(Method::GET, "/api/v1/accounts")
            .await?
            .query(&[("paginate", "true")]);
        let page: Page<Account> = self.client.send(request).await?;
        Ok(page.data)
    }

    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self))]
    pub async fn balance(&self, id: &str) -> Result<Balance> {
        let path = format!("/api/v1/accounts/{}/balance", segment("account id", id)?);
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// First page of the account statement
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self))]
    pub async fn statement(&self, id: &str) -> Result<Vec<Statement>> {
        let path = format!("/api/v1/accounts/{}/statement", segment("account id", id)?);
        let request = self.client.request(Method::GET, &path).await?;
        let page: Page<Statement> = self.client.send(request).await?;
        Ok(page.data)
    }

    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self))]
    pub async fn statement_entry(&self, id: &str) -> Result<Statement> {
        let path = format!("/api/v1/statement/entries/{}", segment("entry id", id)?);
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// Fee applied to one operation type
    ///
    /// `fee_type` is usually a [`FeeType`](crate::types::FeeType); raw strings
    /// are passed through for types this crate does not know yet.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a blank account id or fee type, otherwise the
    /// authentication or transport error of the call.
    #[instrument(skip(self, fee_type), fields(fee_type = fee_type.as_ref()))]
    pub async fn fee(&self, account_id: &str, fee_type: impl AsRef<str>) -> Result<Fee> {
        let fee_type = fee_type.as_ref();
        if fee_type.trim().is_empty() {
            return Err(Error::validation("missing fee type"));
        }
        let path = format!(
            "/api/v1/accounts/{}/fees/{}",
            segment("account id", account_id)?,
            segment("fee type", fee_type)?
        );
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    #[instrument(skip(self))]
    pub async fn fees(&self, account_id: &str) -> Result<Vec<Fee>> {
        let path = format!("/api/v1/accounts/{}/fees", segment("account id", account_id)?);
        let request = self.client.request(Method::GET, &path).await?;
        let page: Page<Fee> = self.client.send(request).await?;
        Ok(page.data)
    }
}
