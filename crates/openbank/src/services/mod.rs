//! Resource services
//!
//! Each service borrows the [`Client`](crate::Client) it was obtained from and
//! is meant to be used inline: `client.accounts().balance(id).await`.

mod accounts;
mod institutions;
mod payment_invoices;
mod payment_links;
mod pix;
mod topups;
mod transfers;

pub use accounts::Accounts;
pub use institutions::Institutions;
pub use payment_invoices::PaymentInvoices;
pub use payment_links::PaymentLinks;
pub use pix::Pix;
pub use topups::Topups;
pub use transfers::Transfers;

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Trimmed, non-empty value of an identifier taken from caller input
fn required<'v>(field: &str, value: &'v str) -> Result<&'v str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{field} can't be empty")));
    }
    Ok(value)
}

/// Identifier escaped for use as one path segment
fn segment<'v>(field: &str, value: &'v str) -> Result<Cow<'v, str>> {
    required(field, value).map(urlencoding::encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_reserved_characters() {
        assert_eq!(segment("id", " a/b?c ").unwrap(), "a%2Fb%3Fc");
        assert_eq!(segment("id", "plain-id").unwrap(), "plain-id");
    }

    #[test]
    fn test_blank_identifier_rejected() {
        let err = segment("account_id", "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == "account_id can't be empty"));
    }
}
