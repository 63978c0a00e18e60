use chrono::Local;
use openbank_http::Method;
use tracing::instrument;

use crate::client::Client;
use crate::error::Result;
use crate::types::{PaymentInvoice, PaymentInvoiceInput};

/// Boleto issuing
#[derive(Debug, Clone, Copy)]
pub struct PaymentInvoices<'a> {
    client: &'a Client,
}

impl<'a> PaymentInvoices<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Issue a boleto
    ///
    /// The input is validated against the local date and normalized (see
    /// [`PaymentInvoiceInput::validate`]) before it is sent.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for rejected input,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip_all, fields(account_id = %input.account_id))]
    pub async fn create(
        &self,
        mut input: PaymentInvoiceInput,
        idempotency_key: &str,
    ) -> Result<PaymentInvoice> {
        input.validate(Local::now().date_naive())?;
        let request = self
            .client
            .request(Method::POST, "/api/v1/barcode_payment_invoices")
            .await?
            .idempotency_key(idempotency_key)
            .json(&input);
        self.client.send(request).await
    }
}
