//! RS256 signing of claim sets

use std::fmt;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rsa::RsaPrivateKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use serde::Serialize;

use crate::error::{AuthError, Result};

/// Signs claim sets as compact RS256 JWTs with the client's private key
#[derive(Clone)]
pub struct ClaimsSigner {
    key: EncodingKey,
    header: Header,
}

impl fmt::Debug for ClaimsSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimsSigner")
            .field("alg", &self.header.alg)
            .finish_non_exhaustive()
    }
}

impl ClaimsSigner {
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the key cannot be re-encoded for the signer.
    pub fn new(private_key: &RsaPrivateKey) -> Result<Self> {
        let der = private_key
            .to_pkcs1_der()
            .map_err(|e| AuthError::Configuration(format!("private key encoding: {e}")))?;
        Ok(Self {
            key: EncodingKey::from_rsa_der(der.as_bytes()),
            header: Header::new(Algorithm::RS256),
        })
    }

    /// Sign `claims`, producing `header.payload.signature`
    ///
    /// # Errors
    ///
    /// [`AuthError::Signing`] if serialization or the RSA operation fails.
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String> {
        jsonwebtoken::encode(&self.header, claims, &self.key).map_err(AuthError::Signing)
    }
}
