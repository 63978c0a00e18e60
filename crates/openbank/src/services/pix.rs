use openbank_http::Method;
use tracing::instrument;

use super::{required, segment};
use crate::client::Client;
use crate::error::Result;
use crate::types::pix::STONE_ISPB;
use crate::types::{
    ConfirmPendingPaymentInput, CreateDynamicQrCodeInput, CreatePendingPaymentInput,
    CreatePixEntryInput, CreatePixEntryOutput, DynamicQrCode, Page, PendingPayment, PixEntry,
    PixInvoice, PixOutboundPayment, QrCode, QrCodeQuery,
};

const ACCOUNT_ID_HEADER: &str = "x-stone-account-id";
const VERIFICATION_ID_HEADER: &str = "x-stone-verification-id";
const VERIFICATION_CODE_HEADER: &str = "x-stone-verification-code";

/// PIX payments, keys and QR codes
#[derive(Debug, Clone, Copy)]
pub struct Pix<'a> {
    client: &'a Client,
}

impl<'a> Pix<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank id,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn outbound_payment(&self, id: &str) -> Result<PixOutboundPayment> {
        let path = format!(
            "/api/v1/pix/outbound_pix_payments/{}",
            segment("payment id", id)?
        );
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }

    /// Decode the payment data behind a BR Code
    ///
    /// The provider expects the query as a JSON body on a `GET`.
    ///
    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip_all)]
    pub async fn qr_code_data(&self, query: &QrCodeQuery) -> Result<QrCode> {
        let request = self
            .client
            .request(Method::GET, "/api/v1/pix/outbound_pix_payments/brcodes")
            .await?
            .json(query);
        self.client.send(request).await
    }

    /// PIX keys registered to an account
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank account id,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn entries(&self, account_id: &str) -> Result<Vec<PixEntry>> {
        let path = format!("/api/v1/pix/{}/entries", segment("account_id", account_id)?);
        let request = self.client.request(Method::GET, &path).await?;
        let page: Page<PixEntry> = self.client.send(request).await?;
        Ok(page.data)
    }

    /// Register a PIX key
    ///
    /// An empty participant ISPB defaults to Stone's. Phone and email keys
    /// need the verification pair from a previous attempt.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank account id,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip_all, fields(account_id = %input.account_id, key_type = %input.key_type))]
    pub async fn create_entry(
        &self,
        mut input: CreatePixEntryInput,
        idempotency_key: &str,
    ) -> Result<CreatePixEntryOutput> {
        let path = format!(
            "/api/v1/pix/{}/entries",
            segment("account_id", &input.account_id)?
        );
        if input.participant_ispb.is_empty() {
            input.participant_ispb = STONE_ISPB.to_string();
        }

        let mut request = self
            .client
            .request(Method::POST, &path)
            .await?
            .idempotency_key(idempotency_key)
            .json(&input);
        if !input.verification_id.is_empty() {
            request = request.header(VERIFICATION_ID_HEADER, &input.verification_id);
        }
        if !input.verification_code.is_empty() {
            request = request.header(VERIFICATION_CODE_HEADER, &input.verification_code);
        }
        self.client.send(request).await
    }

    /// Dynamic QR codes (PIX invoices) issued by an account
    ///
    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank account id,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self))]
    pub async fn dynamic_qr_codes(&self, account_id: &str) -> Result<Vec<DynamicQrCode>> {
        let account_id = required("account_id", account_id)?;
        let request = self
            .client
            .request(Method::GET, "/api/v1/pix_payment_invoices/")
            .await?
            .query(&[("account_id", account_id)])
            .header(ACCOUNT_ID_HEADER, account_id);
        let page: Page<DynamicQrCode> = self.client.send(request).await?;
        Ok(page.data)
    }

    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for input that
    /// [`CreateDynamicQrCodeInput::validate`] rejects, otherwise the
    /// authentication or transport error of the call.
    #[instrument(skip_all, fields(account_id = %input.account_id))]
    pub async fn create_dynamic_qr_code(
        &self,
        input: &CreateDynamicQrCodeInput,
        idempotency_key: &str,
    ) -> Result<PixInvoice> {
        input.validate()?;
        let request = self
            .client
            .request(Method::POST, "/api/v1/pix_payment_invoices")
            .await?
            .idempotency_key(idempotency_key)
            .json(input);
        self.client.send(request).await
    }

    /// Create a PIX payment that waits for [`confirm_pending_payment`](Self::confirm_pending_payment)
    ///
    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip_all, fields(account_id = %input.account_id))]
    pub async fn create_pending_payment(
        &self,
        input: &CreatePendingPaymentInput,
        idempotency_key: &str,
    ) -> Result<PendingPayment> {
        let request = self
            .client
            .request(Method::POST, "/api/v1/pix/outbound_pix_payments")
            .await?
            .idempotency_key(idempotency_key)
            .json(input);
        self.client.send(request).await
    }

    /// # Errors
    ///
    /// [`Error::Validation`](crate::Error::Validation) for a blank payment id,
    /// otherwise the authentication or transport error of the call.
    #[instrument(skip(self, input, idempotency_key))]
    pub async fn confirm_pending_payment(
        &self,
        id: &str,
        input: &ConfirmPendingPaymentInput,
        idempotency_key: &str,
    ) -> Result<()> {
        let path = format!(
            "/api/v1/pix/outbound_pix_payments/{}/actions/confirm",
            segment("payment id", id)?
        );
        let request = self
            .client
            .request(Method::POST, &path)
            .await?
            .idempotency_key(idempotency_key)
            .json(input);
        self.client.send_empty(request).await
    }
}
