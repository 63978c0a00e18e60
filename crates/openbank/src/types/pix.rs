use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::institution::Institution;
use super::transfer::Entity;
use crate::error::{Error, Result};

/// ISPB of Stone, used when a key entry names no participant
pub const STONE_ISPB: &str = "16501555";

/// Accepted length range of a dynamic QR code transaction id
pub const TRANSACTION_ID_LEN: std::ops::RangeInclusive<usize> = 26..=35;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixAccount {
    pub account_code: String,
    pub branch_code: String,
    pub account_type: String,
}

/// Source or target side of a PIX payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixAccountParty {
    pub account: PixAccount,
    pub entity: Entity,
    pub institution: Institution,
}

/// Outbound PIX payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixOutboundPayment {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub fee: i64,
    pub refunded_amount: i64,
    pub description: Option<String>,
    pub end_to_end_id: Option<String>,
    pub transaction_id: Option<String>,
    /// `CREATED`, `FAILED`, `MONEY_RESERVED`, `SETTLED` or `REFUNDED`
    pub status: String,
    pub source: PixAccountParty,
    pub target: PixAccountParty,
    pub key: Option<String>,
    pub request_id: Option<String>,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
    pub failed_at: Option<String>,
    pub failure_reason_code: Option<String>,
    pub failure_reason_description: Option<String>,
    pub money_reserved_at: Option<String>,
    pub settled_at: Option<String>,
}

/// Lookup of the data behind a BR Code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCodeQuery {
    #[serde(rename = "brcode")]
    pub br_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_account: Option<String>,
    #[serde(
        rename = "payment_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl QrCodeQuery {
    pub fn new(br_code: impl Into<String>) -> Self {
        Self {
            br_code: br_code.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCodeAdditionalData {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCodeCustomer {
    pub name: String,
    pub document: String,
    pub document_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicQrCode {
    pub created_at: Option<String>,
    pub requested_at: Option<String>,
    /// Seconds
    pub expiration: i64,
    pub key: String,
    pub customer: QrCodeCustomer,
    pub revision: i64,
    #[serde(rename = "request_for_payer")]
    pub requested_for_payer: Option<String>,
    pub status: String,
    pub transaction_id: String,
    pub amount: i64,
    pub additional_data: Vec<QrCodeAdditionalData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticQrCode {
    pub key: String,
    pub key_type: Option<String>,
    pub transaction_id: Option<String>,
    pub amount: i64,
}

/// Decoded BR Code; `kind` tells which of `static`/`dynamic` is filled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "static")]
    pub static_code: Option<StaticQrCode>,
    #[serde(rename = "dynamic")]
    pub dynamic_code: Option<DynamicQrCode>,
}

/// Body of a dynamic QR code (PIX invoice) creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDynamicQrCodeInput {
    #[serde(skip_serializing_if = "is_zero")]
    pub amount: i64,
    pub account_id: String,
    pub key: String,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_data: Vec<QrCodeAdditionalData>,
    pub request_for_payer: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl CreateDynamicQrCodeInput {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the account, key or transaction id
    /// is missing, or the transaction id length is outside 26 to 35.
    pub fn validate(&self) -> Result<()> {
        if self.account_id.is_empty() {
            return Err(Error::validation("account_id can't be empty"));
        }
        if self.key.is_empty() {
            return Err(Error::validation("key can't be empty"));
        }
        if self.transaction_id.is_empty() {
            return Err(Error::validation("transaction_id can't be empty"));
        }
        if !TRANSACTION_ID_LEN.contains(&self.transaction_id.len()) {
            return Err(Error::validation(format!(
                "transaction_id must be between {} and {} characters",
                TRANSACTION_ID_LEN.start(),
                TRANSACTION_ID_LEN.end()
            )));
        }
        Ok(())
    }
}

/// A PIX invoice backing a dynamic QR code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixInvoice {
    pub id: String,
    pub account_id: String,
    pub status: String,
    pub key: String,
    pub key_type: String,
    pub transaction_id: String,
    pub amount: i64,
    pub additional_data: Vec<QrCodeAdditionalData>,
    pub request_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub paid_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub created_by: Option<String>,
    pub last_updated_by: Option<String>,
    pub expiration: i64,
    pub qr_code_content: Option<String>,
    /// Base64 PNG
    pub qr_code_image: Option<String>,
    pub request_for_payer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePendingPaymentInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub amount: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PixAccountParty>,
}

/// A PIX payment created and waiting for confirmation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingPayment {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub description: Option<String>,
    pub transaction_id: Option<String>,
    pub key: Option<String>,
    pub end_to_end_id: Option<String>,
    pub failed_at: Value,
    pub failure_reason_code: Value,
    pub failure_reason_description: Value,
    pub money_reserved_at: Value,
    pub refunded_amount: i64,
    pub request_id: Option<String>,
    pub settled_at: Value,
    pub source: PixAccountParty,
    pub target: PixAccountParty,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPendingPaymentInput {
    pub amount: i64,
    pub description: String,
    pub add_target_to_contacts: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeneficiaryAccount {
    pub branch_code: String,
    pub account_code: String,
    pub account_type: String,
    pub created_at: Option<String>,
}

/// A PIX key registered to an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixEntry {
    pub id: String,
    pub key: String,
    pub key_type: String,
    #[serde(alias = "key_status")]
    pub status: String,
    pub account_id: String,
    pub participant_ispb: String,
    pub beneficiary_account: Option<BeneficiaryAccount>,
    pub beneficiary_entity: Option<Entity>,
}

/// Registration of a new PIX key
///
/// The verification pair is only needed for phone and email keys and travels
/// as request headers rather than in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePixEntryInput {
    #[serde(skip)]
    pub account_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    pub key_type: String,
    pub participant_ispb: String,
    #[serde(skip)]
    pub verification_id: String,
    #[serde(skip)]
    pub verification_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePixEntryOutput {
    pub id: String,
    pub verification_id: Option<String>,
}
