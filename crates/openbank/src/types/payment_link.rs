use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkCustomer {
    pub id: String,
    pub name: String,
    pub delinquent: bool,
    pub phones: Value,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkInstallment {
    pub number: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkCardAuthentication {
    pub threed_secure: Value,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkCreditCard {
    pub authentication: PaymentLinkCardAuthentication,
    pub capture: bool,
    pub installments: Vec<PaymentLinkInstallment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkCheckout {
    pub id: String,
    pub accepted_multi_payment_methods: Vec<String>,
    pub accepted_payment_methods: Vec<String>,
    pub amount: i64,
    pub billing_address: Value,
    pub billing_address_editable: bool,
    pub credit_card: PaymentLinkCreditCard,
    pub currency: String,
    pub customer: PaymentLinkCustomer,
    pub customer_editable: bool,
    pub expires_at: Option<String>,
    pub metadata: Value,
    pub payment_url: String,
    pub required_fields: Vec<String>,
    pub shippable: bool,
    pub skip_checkout_success_page: bool,
    pub status: String,
    pub success_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLinkItem {
    pub id: String,
    pub amount: i64,
    pub description: String,
    pub quantity: i64,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// An order created through a payment link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentLink {
    pub id: String,
    pub amount: i64,
    pub checkouts: Vec<PaymentLinkCheckout>,
    pub closed: bool,
    pub code: String,
    pub currency: String,
    pub customer: PaymentLinkCustomer,
    pub items: Vec<PaymentLinkItem>,
    pub session_id: String,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
