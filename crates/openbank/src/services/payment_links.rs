use openbank_http::Method;
use tracing::instrument;

use super::segment;
use crate::client::Client;
use crate::error::Result;
use crate::types::PaymentLink;

#[derive(Debug, Clone, Copy)]
pub struct PaymentLinks<'a> {
    client: &'a Client,
}

impl<'a> PaymentLinks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Order placed through a payment link of `account_id`
    ///
    /// Both ids are trimmed before use.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) when either id is blank,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn get(&self, account_id: &str, order_id: &str) -> Result<PaymentLink> {
        let path = format!(
            "/api/v1/payment_links/{}/orders/{}",
            segment("account_id", account_id)?,
            segment("order_id", order_id)?
        );
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }
}
