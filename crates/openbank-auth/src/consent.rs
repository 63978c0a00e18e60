//! Consent links
//!
//! A consent link sends the account holder to the provider's consent screen
//! with a signed consent JWT. Building one needs no network call.

use chrono::{DateTime, Utc};
use url::Url;

use crate::claims::ConsentClaims;
use crate::error::{AuthError, Result};
use crate::identity::ClientIdentity;

/// A signed consent redirect plus the session it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentLink {
    pub url: Url,
    pub session_id: String,
}

/// Build `{account_url}/#/consent?type=consent&client_id={id}&jwt={jwt}`
///
/// A blank or absent `session_id` gets a fresh random session.
///
/// # Errors
///
/// [`AuthError::Signing`] if the consent claims cannot be signed,
/// [`AuthError::Configuration`] if the account URL cannot be a base.
pub fn consent_link(
    identity: &ClientIdentity,
    session_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ConsentLink> {
    let claims = ConsentClaims::new(identity, session_id, now);
    let jwt = identity.signer().sign(&claims)?;

    let reference = format!(
        "/#/consent?type=consent&client_id={}&jwt={}",
        urlencoding::encode(identity.client_id()),
        jwt
    );
    let url = identity
        .account_url()
        .join(&reference)
        .map_err(|e| AuthError::Configuration(format!("consent url: {e}")))?;

    Ok(ConsentLink {
        url,
        session_id: claims.session_metadata.client_session,
    })
}
