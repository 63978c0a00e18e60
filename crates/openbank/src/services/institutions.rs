use openbank_http::Method;
use tracing::instrument;

use super::segment;
use crate::client::Client;
use crate::error::Result;
use crate::types::{Institution, InstitutionContext};

#[derive(Debug, Clone, Copy)]
pub struct Institutions<'a> {
    client: &'a Client,
}

impl<'a> Institutions<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Look up one institution by ISPB or number code
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank code,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn get(&self, code: &str) -> Result<Institution> {
        let path = format!("/api/v1/institutions/{}", segment("institution code", code)?);
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip(self))]
    pub async fn list(&self, context: InstitutionContext) -> Result<Vec<Institution>> {
        let request = self
            .client
            .request(Method::GET, "/api/v1/institutions")
            .await?
            .query(&[("context", context.as_str())]);
        self.client.send(request).await
    }
}
