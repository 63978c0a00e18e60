use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Person or company on one side of a transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub document: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub document_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferAccount {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branch_code: String,
    pub institution_ispb: String,
    /// Set for transfers leaving the bank; empty for internal ones
    pub institution_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub institution_name: String,
    pub institution_number_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub account: TransferAccount,
    pub entity: Entity,
}

/// Body of a transfer or transfer simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferInput {
    pub account_id: String,
    /// Cents
    #[serde(skip_serializing_if = "is_zero")]
    pub amount: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scheduled_to: String,
    pub target: Target,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl TransferInput {
    /// Whether the target lives in another institution
    pub fn is_external(&self) -> bool {
        !self.target.account.institution_code.is_empty()
    }

    /// Checks the fields the API requires for this kind of transfer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(Error::validation("amount can't be 0"));
        }
        if self.account_id.is_empty() {
            return Err(Error::validation("account_id can't be empty"));
        }
        let target = &self.target;
        if target.account.account_code.is_empty() {
            return Err(Error::validation("account_code can't be empty"));
        }
        if self.is_external() {
            if target.account.branch_code.is_empty() {
                return Err(Error::validation("branch_code can't be empty"));
            }
            if target.entity.name.is_empty() {
                return Err(Error::validation("entity name can't be empty"));
            }
            if target.entity.document.is_empty() {
                return Err(Error::validation("entity document can't be empty"));
            }
            if target.entity.document_type.is_empty() {
                return Err(Error::validation("entity document type can't be empty"));
            }
        }
        Ok(())
    }
}

/// An internal or external transfer as reported by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transfer {
    pub id: String,
    pub amount: i64,
    pub fee: i64,
    pub target: Target,
    pub status: String,
    pub description: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
    pub approval_expired_at: Option<String>,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub rejected_at: Option<String>,
    pub rejected_by: Option<String>,
    pub failed_at: Option<String>,
    pub failure_reason_code: Option<String>,
    pub failure_reason_description: Option<String>,
    pub cancelled_at: Option<String>,
    pub finished_at: Option<String>,
    pub scheduled_to: Option<String>,
    pub scheduled_to_effective: Option<String>,
    pub scheduled_to_requested: Option<String>,
    pub refunded_at: Option<String>,
    pub refund_reason_code: Option<String>,
    pub refund_reason_description: Option<String>,
    pub delayed_to_next_business_day: bool,
}
