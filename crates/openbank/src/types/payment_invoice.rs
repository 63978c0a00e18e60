use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest invoice amount, in cents
pub const INVOICE_AMOUNT_MIN: i64 = 2_000;
/// Largest invoice amount, in cents
pub const INVOICE_AMOUNT_MAX: i64 = 1_000_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    #[default]
    Deposit,
    Proposal,
    BillOfExchange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInvoicePayerInput {
    pub document: String,
    pub legal_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trade_name: String,
}

/// Request to issue a boleto
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInvoiceInput {
    pub account_id: String,
    /// Cents
    pub amount: i64,
    /// `YYYY-MM-DD`
    pub expiration_date: String,
    /// `YYYY-MM-DD`; only meaningful for bills of exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_date: Option<String>,
    pub invoice_type: InvoiceType,
    pub payer: PaymentInvoicePayerInput,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

impl PaymentInvoiceInput {
    /// Checks the invoice against `today` and normalizes it for sending
    ///
    /// Deposits and proposals get `limit_date` set to the expiration date, as
    /// do bills of exchange without one. The payer document is reduced to its
    /// digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank account, an amount outside
    /// the accepted range, an expiration date that is malformed or already
    /// past, a limit date before the expiration date, or a missing payer on
    /// anything but a deposit.
    pub fn validate(&mut self, today: NaiveDate) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::validation("account_id can't be empty"));
        }
        if !(INVOICE_AMOUNT_MIN..=INVOICE_AMOUNT_MAX).contains(&self.amount) {
            return Err(Error::validation(format!(
                "amount can't be < {INVOICE_AMOUNT_MIN} or > {INVOICE_AMOUNT_MAX}"
            )));
        }

        let expiration = parse_date(&self.expiration_date)
            .filter(|date| *date >= today)
            .ok_or_else(|| Error::validation("invalid expiration_date"))?;

        match self.invoice_type {
            InvoiceType::Deposit | InvoiceType::Proposal => {
                self.limit_date = Some(self.expiration_date.clone());
            }
            InvoiceType::BillOfExchange => match self.limit_date.as_deref().map(str::trim) {
                None | Some("") => self.limit_date = Some(self.expiration_date.clone()),
                Some(limit) => {
                    if parse_date(limit).is_none_or(|date| date < expiration) {
                        return Err(Error::validation("invalid limit_date"));
                    }
                }
            },
        }

        if self.invoice_type != InvoiceType::Deposit {
            if self.payer.legal_name.trim().is_empty() {
                return Err(Error::validation("payer legal_name can't be empty"));
            }
            self.payer.document.retain(|c| c.is_ascii_digit());
            if self.payer.document.is_empty() {
                return Err(Error::validation("payer document can't be empty"));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInvoiceParty {
    pub account_code: Option<String>,
    pub branch_code: Option<String>,
    pub document: String,
    pub document_type: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
}

/// An issued boleto
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInvoice {
    pub id: String,
    pub account_id: String,
    pub amount: i64,
    pub barcode: String,
    pub writable_line: String,
    pub expiration_date: String,
    pub invoice_type: String,
    pub issuance_date: Option<String>,
    pub limit_date: Option<String>,
    pub status: String,
    pub our_number: Option<String>,
    pub beneficiary: PaymentInvoiceParty,
    pub payer: PaymentInvoiceParty,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub registered_at: Option<String>,
    pub settled_at: Option<String>,
}
