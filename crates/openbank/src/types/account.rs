use std::fmt;

use serde::{Deserialize, Serialize};

use super::transfer::Entity;

/// A payment account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub id: String,
    pub account_code: String,
    pub branch_code: String,
    pub owner_document: String,
    pub owner_id: String,
    pub owner_name: String,
    pub restricted_features: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub balance: i64,
    pub blocked_balance: i64,
    pub scheduled_balance: i64,
}

/// Extra details some statement entries carry (boletos, external transfers)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementDetails {
    pub bank_name: Option<String>,
    pub recipient_cpf_cnpj: Option<String>,
    pub recipient_name: Option<String>,
    pub writable_line: Option<String>,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterPartyAccount {
    pub institution: Option<String>,
    pub institution_name: Option<String>,
    pub account_code: Option<String>,
    pub branch_code: Option<String>,
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterParty {
    pub account: CounterPartyAccount,
    pub entity: Entity,
}

/// One account statement entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub balance_after: Option<i64>,
    pub balance_before: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub status: Option<String>,
    pub operation: Option<String>,
    pub operation_id: Option<String>,
    pub description: Option<String>,
    pub operation_amount: Option<i64>,
    pub fee_amount: Option<i64>,
    pub refund_reason_code: Option<String>,
    pub refund_reason_description: Option<String>,
    pub original_operation_id: Option<String>,
    pub refunded_at: Option<String>,
    pub barcode: Option<String>,
    pub card_network_code: Option<String>,
    pub card_network_name: Option<String>,
    pub card_type: Option<String>,
    pub is_prepayment: bool,
    pub details: Option<StatementDetails>,
    pub counter_party: Option<CounterParty>,
    pub delayed_to_next_business_day: bool,
}

/// Fee charged for one operation type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fee {
    pub amount: i64,
    pub fee_type: String,
    pub billing_exemption_participant: bool,
    pub original_fee: i64,
    pub max_free_transfers: i64,
    pub remaining_free_transfers: i64,
}

/// Operation types the fee endpoint knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeType {
    InternalTransfer,
    ExternalTransfer,
    BarcodePayment,
    PrepaidCardWithdrawal,
    BarcodePaymentInvoice,
}

impl FeeType {
    pub const ALL: [Self; 5] = [
        Self::InternalTransfer,
        Self::ExternalTransfer,
        Self::BarcodePayment,
        Self::PrepaidCardWithdrawal,
        Self::BarcodePaymentInvoice,
    ];

    /// Path segment used by the API
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InternalTransfer => "internal_transfer",
            Self::ExternalTransfer => "external_transfer",
            Self::BarcodePayment => "barcode_payment",
            // Spelled this way by the provider
            Self::PrepaidCardWithdrawal => "outbond_stone_prepaid_card_wirhdrawal",
            Self::BarcodePaymentInvoice => "barcode_payment_invoice",
        }
    }
}

impl AsRef<str> for FeeType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
