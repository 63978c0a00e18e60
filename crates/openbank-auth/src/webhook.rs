//! Inbound webhook decryption and signature verification
//!
//! A webhook arrives as a JWE encrypted to the client's public key. Inside is
//! a JWS signed by one of the provider's keys. Verification runs strictly in
//! order and stops at the first failure:
//!
//! 1. decrypt the JWE with the client's private key
//! 2. parse the plaintext as a JWS
//! 3. require exactly one signature and read its `kid`
//! 4. resolve the key, refreshing the [`KeyCache`] once on a miss
//! 5. turn the JWK into a verifying key pinned to its `alg`
//! 6. verify the signature
//!
//! Only then is the payload handed back.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use crate::error::{JoseError, WebhookError};
use crate::identity::ClientIdentity;
use crate::jose::{JweMessage, JwsMessage};
use crate::keys::KeyCache;

#[derive(Deserialize)]
struct Envelope {
    encrypted_body: String,
}

/// Decrypts and verifies webhook deliveries
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    identity: Arc<ClientIdentity>,
    keys: Arc<KeyCache>,
}

impl WebhookVerifier {
    pub fn new(identity: Arc<ClientIdentity>, keys: Arc<KeyCache>) -> Self {
        Self { identity, keys }
    }

    pub fn keys(&self) -> &Arc<KeyCache> {
        &self.keys
    }

    /// Verify an encrypted webhook and return its payload bytes
    ///
    /// # Errors
    ///
    /// One [`WebhookError`] variant per failed step; see the module docs.
    #[instrument(skip_all, fields(len = encrypted.len()))]
    pub async fn verify(&self, encrypted: &str) -> Result<Vec<u8>, WebhookError> {
        let plaintext = JweMessage::parse(encrypted)
            .and_then(|jwe| jwe.decrypt(self.identity.private_key()))
            .map_err(|e| {
                error!(error = %e, "webhook decryption failed");
                WebhookError::Decrypt(e)
            })?;

        let jws = std::str::from_utf8(&plaintext)
            .map_err(|_| JoseError::Format("decrypted webhook is not UTF-8".into()))
            .and_then(JwsMessage::parse)
            .map_err(WebhookError::Parse)?;

        let [signature] = jws.signatures() else {
            let count = jws.signatures().len();
            warn!(count, "webhook does not carry exactly one signature");
            return Err(WebhookError::UnsupportedSignature { count });
        };
        let kid = signature.key_id().ok_or_else(|| {
            WebhookError::Parse(JoseError::Format("webhook signature has no kid".into()))
        })?;

        let jwk = self.keys.resolve(kid).await.map_err(|e| {
            warn!(kid, error = %e, "webhook signing key unavailable");
            WebhookError::from(e)
        })?;
        let key = jwk.to_verifying_key().map_err(|e| {
            warn!(kid, kty = %jwk.kty, error = %e, "provider published an unusable signing key");
            WebhookError::UnsupportedKey {
                kid: kid.to_string(),
                source: e,
            }
        })?;

        jws.verify_signature(signature, &key).map_err(|e| {
            error!(kid, error = %e, "webhook signature rejected");
            WebhookError::SignatureInvalid(e)
        })?;

        debug!(kid, "webhook verified");
        Ok(jws.into_payload())
    }

    /// Verify a raw request body
    ///
    /// Accepts `{"encrypted_body": "<jwe>"}`, a JSON string literal holding
    /// the JWE, or the bare JWE text.
    ///
    /// # Errors
    ///
    /// [`WebhookError::Envelope`] if the body is JSON of any other shape or
    /// not UTF-8, otherwise as [`verify`](Self::verify).
    pub async fn verify_body(&self, body: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let encrypted = extract_encrypted(body)?;
        self.verify(&encrypted).await
    }

    /// Verify a raw request body and decode its payload as JSON
    ///
    /// # Errors
    ///
    /// As [`verify_body`](Self::verify_body), plus [`WebhookError::Parse`]
    /// if the verified payload does not decode as `T`.
    pub async fn verify_json<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, WebhookError> {
        let payload = self.verify_body(body).await?;
        serde_json::from_slice(&payload).map_err(|e| WebhookError::Parse(JoseError::Header(e)))
    }
}

/// Pull the encrypted string out of an inbound body
///
/// # Errors
///
/// [`WebhookError::Envelope`] for non-UTF-8 or empty bodies and JSON
/// objects that are neither an envelope nor a JWE.
pub fn extract_encrypted(body: &[u8]) -> Result<String, WebhookError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| WebhookError::Envelope("body is not UTF-8".into()))?
        .trim();

    if text.starts_with('{') {
        // A JSON-serialized JWE is an object too; only reject objects that
        // are neither an envelope nor a JWE.
        if let Ok(envelope) = serde_json::from_str::<Envelope>(text) {
            return Ok(envelope.encrypted_body);
        }
        if text.contains("\"ciphertext\"") {
            return Ok(text.to_string());
        }
        return Err(WebhookError::Envelope(
            "expected an object with an \"encrypted_body\" string".into(),
        ));
    }
    if text.starts_with('"') {
        return serde_json::from_str::<String>(text)
            .map_err(|e| WebhookError::Envelope(format!("invalid JSON string: {e}")));
    }
    if text.is_empty() {
        return Err(WebhookError::Envelope("empty body".into()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_envelope_forms() {
        assert_eq!(
            extract_encrypted(br#"{"encrypted_body":"a.b.c.d.e"}"#).unwrap(),
            "a.b.c.d.e"
        );
        assert_eq!(extract_encrypted(br#""a.b.c.d.e""#).unwrap(), "a.b.c.d.e");
        assert_eq!(extract_encrypted(b"  a.b.c.d.e\n").unwrap(), "a.b.c.d.e");

        let json_jwe = r#"{"protected":"x","iv":"y","ciphertext":"z","tag":"t"}"#;
        assert_eq!(extract_encrypted(json_jwe.as_bytes()).unwrap(), json_jwe);
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        for body in [
            br#"{"event":"cash_in"}"#.as_slice(),
            br#"{"encrypted_body": 42}"#.as_slice(),
            b"".as_slice(),
            b"\xff\xfe".as_slice(),
        ] {
            assert!(
                matches!(extract_encrypted(body), Err(WebhookError::Envelope(_))),
                "{body:?}"
            );
        }
    }
}
