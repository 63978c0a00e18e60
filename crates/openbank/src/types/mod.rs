//! Wire types of the resource API
//!
//! Response types default every member so that fields the provider omits or
//! adds never break decoding. Amounts are integer cents.

pub mod account;
pub mod institution;
pub mod payment_invoice;
pub mod payment_link;
pub mod pix;
pub mod topup;
pub mod transfer;

use serde::{Deserialize, Serialize};

pub use account::{Account, Balance, CounterParty, Fee, FeeType, Statement, StatementDetails};
pub use institution::{Institution, InstitutionContext};
pub use payment_invoice::{
    InvoiceType, PaymentInvoice, PaymentInvoiceInput, PaymentInvoiceParty, PaymentInvoicePayerInput,
};
pub use payment_link::{PaymentLink, PaymentLinkCheckout, PaymentLinkCustomer, PaymentLinkItem};
pub use pix::{
    ConfirmPendingPaymentInput, CreateDynamicQrCodeInput, CreatePendingPaymentInput,
    CreatePixEntryInput, CreatePixEntryOutput, DynamicQrCode, PendingPayment, PixAccountParty,
    PixEntry, PixInvoice, PixOutboundPayment, QrCode, QrCodeAdditionalData, QrCodeQuery,
    StaticQrCode,
};
pub use topup::{GameProduct, GameProducts, GameProvider, GameProviders};
pub use transfer::{Entity, Target, Transfer, TransferAccount, TransferInput};

/// Pagination cursor of list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `{"cursor": ..., "data": [...]}` list envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub cursor: Cursor,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
