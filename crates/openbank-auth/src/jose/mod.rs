//! JOSE primitives for the webhook path
//!
//! Covers what a standards-conforming provider may send: RSA and EC (P-256,
//! P-384, P-521) keys, RS/PS/ES signatures, RSA-OAEP key transport, and
//! AES-GCM or AES-CBC with HMAC-SHA2 content encryption. Both compact and
//! JSON serializations are parsed, and every part is reachable through typed
//! accessors.

pub mod jwe;
pub mod jwk;
pub mod jws;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::JoseError;

pub use jwe::JweMessage;
pub use jwk::{Jwk, JwkSet, KeyMaterial, VerifyingKey};
pub use jws::{JwsHeader, JwsMessage, JwsSignature};

/// Decode a base64url segment, tolerating trailing padding
pub(crate) fn b64_decode(part: &'static str, value: &str) -> Result<Vec<u8>, JoseError> {
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|_| JoseError::Base64(part))
}

pub(crate) fn b64_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
