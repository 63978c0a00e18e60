//! JSON Web Signature (RFC 7515)
//!
//! [`JwsMessage::parse`] accepts the compact form and both JSON forms
//! (general `signatures` array, flattened `signature` member). Headers,
//! payload and every signature are exposed directly, so nothing has to be
//! re-serialized to get at the signed content.

use p256::ecdsa::signature::{Signer, Verifier};
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::jwk::{KeyMaterial, VerifyingKey};
use super::{b64_decode, b64_encode};
use crate::error::JoseError;

/// JOSE header members relevant to signature verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crit: Vec<String>,
}

/// One signature of a [`JwsMessage`]
#[derive(Debug, Clone)]
pub struct JwsSignature {
    protected_b64: String,
    protected: JwsHeader,
    header: Option<JwsHeader>,
    signature: Vec<u8>,
}

/// A parsed JWS with any number of signatures
#[derive(Debug, Clone)]
pub struct JwsMessage {
    payload_b64: String,
    payload: Vec<u8>,
    signatures: Vec<JwsSignature>,
}

#[derive(Deserialize)]
struct JsonSerialization {
    payload: String,
    #[serde(default)]
    signatures: Option<Vec<JsonSignature>>,
    #[serde(flatten)]
    flattened: JsonSignatureFields,
}

#[derive(Deserialize)]
struct JsonSignature {
    #[serde(flatten)]
    fields: JsonSignatureFields,
}

#[derive(Deserialize)]
struct JsonSignatureFields {
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    header: Option<JwsHeader>,
    #[serde(default)]
    signature: Option<String>,
}

impl JwsSignature {
    fn new(
        protected_b64: Option<String>,
        header: Option<JwsHeader>,
        signature_b64: &str,
    ) -> Result<Self, JoseError> {
        let protected_b64 = protected_b64.unwrap_or_default();
        let protected = if protected_b64.is_empty() {
            JwsHeader::default()
        } else {
            serde_json::from_slice(&b64_decode("protected header", &protected_b64)?)?
        };
        Ok(Self {
            protected_b64,
            protected,
            header,
            signature: b64_decode("signature", signature_b64)?,
        })
    }

    /// Integrity-protected header
    pub fn protected_header(&self) -> &JwsHeader {
        &self.protected
    }

    /// Unprotected per-signature header (JSON serialization only)
    pub fn unprotected_header(&self) -> Option<&JwsHeader> {
        self.header.as_ref()
    }

    /// Key id, preferring the protected header
    pub fn key_id(&self) -> Option<&str> {
        self.protected
            .kid
            .as_deref()
            .or_else(|| self.header.as_ref()?.kid.as_deref())
    }

    /// Signature algorithm
    ///
    /// Read from the protected header only: an unprotected `alg` is not
    /// covered by the signature and is ignored.
    pub fn algorithm(&self) -> Option<&str> {
        self.protected.alg.as_deref()
    }

    /// Raw signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// `ASCII(BASE64URL(protected) || '.' || BASE64URL(payload))`
    pub fn signing_input(&self, payload_b64: &str) -> Vec<u8> {
        format!("{}.{}", self.protected_b64, payload_b64).into_bytes()
    }

    /// Check this signature over `payload_b64`
    ///
    /// # Errors
    ///
    /// - [`JoseError::UnsupportedAlgorithm`] for a missing `alg`, `none`, HMAC
    ///   and unknown algorithms, or any `crit` extension
    /// - [`JoseError::KeyMismatch`] when `alg` does not fit the key type or
    ///   differs from the algorithm the key is pinned to
    /// - [`JoseError::BadSignature`] when the signature does not match
    pub fn verify(&self, payload_b64: &str, key: &VerifyingKey) -> Result<(), JoseError> {
        if let Some(ext) = self.protected.crit.first() {
            return Err(JoseError::UnsupportedAlgorithm(format!("crit {ext}")));
        }
        let alg = self
            .algorithm()
            .ok_or_else(|| JoseError::UnsupportedAlgorithm(String::new()))?;
        if let Some(pinned) = key.algorithm()
            && pinned != alg
        {
            return Err(JoseError::KeyMismatch {
                alg: alg.to_string(),
                reason: format!("key is pinned to {pinned}"),
            });
        }

        let input = self.signing_input(payload_b64);
        let sig = self.signature.as_slice();
        let valid = match (alg, key.material()) {
            ("RS256", KeyMaterial::Rsa(k)) => k
                .verify(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(&input), sig)
                .is_ok(),
            ("RS384", KeyMaterial::Rsa(k)) => k
                .verify(Pkcs1v15Sign::new::<Sha384>(), &Sha384::digest(&input), sig)
                .is_ok(),
            ("RS512", KeyMaterial::Rsa(k)) => k
                .verify(Pkcs1v15Sign::new::<Sha512>(), &Sha512::digest(&input), sig)
                .is_ok(),
            ("PS256", KeyMaterial::Rsa(k)) => k
                .verify(Pss::new::<Sha256>(), &Sha256::digest(&input), sig)
                .is_ok(),
            ("PS384", KeyMaterial::Rsa(k)) => k
                .verify(Pss::new::<Sha384>(), &Sha384::digest(&input), sig)
                .is_ok(),
            ("PS512", KeyMaterial::Rsa(k)) => k
                .verify(Pss::new::<Sha512>(), &Sha512::digest(&input), sig)
                .is_ok(),
            // ECDSA signatures are the fixed-width R || S concatenation
            ("ES256", KeyMaterial::P256(k)) => p256::ecdsa::Signature::from_slice(sig)
                .is_ok_and(|s| Verifier::verify(k, &input, &s).is_ok()),
            ("ES384", KeyMaterial::P384(k)) => p384::ecdsa::Signature::from_slice(sig)
                .is_ok_and(|s| Verifier::verify(k, &input, &s).is_ok()),
            ("ES512", KeyMaterial::P521(k)) => p521::ecdsa::Signature::from_slice(sig)
                .is_ok_and(|s| Verifier::verify(k, &input, &s).is_ok()),
            (
                "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" | "ES256" | "ES384"
                | "ES512",
                material,
            ) => {
                return Err(JoseError::KeyMismatch {
                    alg: alg.to_string(),
                    reason: format!("key is {}", material.family()),
                });
            }
            (other, _) => return Err(JoseError::UnsupportedAlgorithm(other.to_string())),
        };
        if valid { Ok(()) } else { Err(JoseError::BadSignature) }
    }
}

impl JwsMessage {
    /// Parse compact or JSON serialization
    ///
    /// # Errors
    ///
    /// [`JoseError`] when the input matches neither serialization or a
    /// segment fails to decode.
    pub fn parse(input: &str) -> Result<Self, JoseError> {
        let input = input.trim();
        if input.starts_with('{') {
            Self::parse_json(input)
        } else {
            Self::parse_compact(input)
        }
    }

    fn parse_compact(input: &str) -> Result<Self, JoseError> {
        let parts: Vec<&str> = input.split('.').collect();
        let [protected, payload, signature] = parts.as_slice() else {
            return Err(JoseError::Format(format!(
                "compact JWS: expected 3 segments, found {}",
                parts.len()
            )));
        };
        if protected.is_empty() {
            return Err(JoseError::Format("compact JWS: empty protected header".into()));
        }
        let signature = JwsSignature::new(Some((*protected).to_string()), None, signature)?;
        Ok(Self {
            payload: b64_decode("payload", payload)?,
            payload_b64: (*payload).to_string(),
            signatures: vec![signature],
        })
    }

    fn parse_json(input: &str) -> Result<Self, JoseError> {
        let json: JsonSerialization = serde_json::from_str(input)?;
        let flattened = json.flattened;

        let signatures = match (json.signatures, flattened.signature) {
            (Some(_), Some(_)) => {
                return Err(JoseError::Format(
                    "JSON JWS: both 'signatures' and 'signature' present".into(),
                ));
            }
            (Some(list), None) => list
                .into_iter()
                .map(|s| {
                    let signature = s.fields.signature.ok_or_else(|| {
                        JoseError::Format("JSON JWS: signature entry without 'signature'".into())
                    })?;
                    JwsSignature::new(s.fields.protected, s.fields.header, &signature)
                })
                .collect::<Result<Vec<_>, _>>()?,
            (None, Some(signature)) => vec![JwsSignature::new(
                flattened.protected,
                flattened.header,
                &signature,
            )?],
            (None, None) => Vec::new(),
        };

        Ok(Self {
            payload: b64_decode("payload", &json.payload)?,
            payload_b64: json.payload,
            signatures,
        })
    }

    pub fn signatures(&self) -> &[JwsSignature] {
        &self.signatures
    }

    /// Decoded payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload exactly as it appeared on the wire
    pub fn encoded_payload(&self) -> &str {
        &self.payload_b64
    }

    /// Consume the message, keeping the decoded payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Verify `signature` (one of [`signatures`](Self::signatures)) over this payload
    ///
    /// # Errors
    ///
    /// See [`JwsSignature::verify`].
    pub fn verify_signature(
        &self,
        signature: &JwsSignature,
        key: &VerifyingKey,
    ) -> Result<(), JoseError> {
        signature.verify(&self.payload_b64, key)
    }
}

/// Produce a compact JWS with `header` as the protected header
///
/// `sign` receives the signing input and returns the raw signature bytes.
///
/// # Errors
///
/// Whatever `sign` returns, or [`JoseError::Header`] if the header does not
/// serialize.
pub fn sign_compact_with<F>(header: &JwsHeader, payload: &[u8], sign: F) -> Result<String, JoseError>
where
    F: FnOnce(&[u8]) -> Result<Vec<u8>, JoseError>,
{
    let protected_b64 = b64_encode(serde_json::to_vec(header)?);
    let input = format!("{protected_b64}.{}", b64_encode(payload));
    let signature = sign(input.as_bytes())?;
    Ok(format!("{input}.{}", b64_encode(signature)))
}

/// Produce an RS256 compact JWS over `payload` with `kid` in the protected header
///
/// # Errors
///
/// [`JoseError::InvalidKey`] if the RSA backend refuses to sign.
pub fn sign_compact(payload: &[u8], key: &RsaPrivateKey, kid: &str) -> Result<String, JoseError> {
    let header = JwsHeader {
        alg: Some("RS256".to_string()),
        kid: Some(kid.to_string()),
        ..JwsHeader::default()
    };
    sign_compact_with(&header, payload, |input| {
        key.sign(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(input))
            .map_err(|e| JoseError::InvalidKey(e.to_string()))
    })
}

/// Produce an ES256 compact JWS over `payload` with `kid` in the protected header
///
/// # Errors
///
/// [`JoseError::Header`] only; ECDSA signing itself cannot fail here.
pub fn sign_compact_es256(
    payload: &[u8],
    key: &p256::ecdsa::SigningKey,
    kid: &str,
) -> Result<String, JoseError> {
    let header = JwsHeader {
        alg: Some("ES256".to_string()),
        kid: Some(kid.to_string()),
        ..JwsHeader::default()
    };
    sign_compact_with(&header, payload, |input| {
        let signature: p256::ecdsa::Signature = Signer::sign(key, input);
        Ok(signature.to_bytes().to_vec())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs8::DecodePrivateKey;
    use serde_json::json;

    const K1_PEM: &str = include_str!("../../tests/fixtures/provider_k1.pem");
    const K2_PEM: &str = include_str!("../../tests/fixtures/provider_k2.pem");

    fn key(pem: &str) -> RsaPrivateKey {
        RsaPrivateKey::from_pkcs8_pem(pem).unwrap()
    }

    fn verifying(pem: &str) -> VerifyingKey {
        VerifyingKey::from(key(pem).to_public_key())
    }

    #[test]
    fn test_compact_sign_then_verify() {
        let k1 = key(K1_PEM);
        let token = sign_compact(br#"{"event":"ping"}"#, &k1, "K1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();

        assert_eq!(jws.signatures().len(), 1);
        let sig = &jws.signatures()[0];
        assert_eq!(sig.key_id(), Some("K1"));
        assert_eq!(sig.algorithm(), Some("RS256"));
        assert_eq!(jws.payload(), br#"{"event":"ping"}"#);
        jws.verify_signature(sig, &VerifyingKey::from(k1.to_public_key()))
            .unwrap();
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = sign_compact(b"hello", &key(K1_PEM), "K1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        let err = jws
            .verify_signature(&jws.signatures()[0], &verifying(K2_PEM))
            .unwrap_err();
        assert!(matches!(err, JoseError::BadSignature));
    }

    #[test]
    fn test_json_general_and_flattened_forms() {
        let k1 = key(K1_PEM);
        let token = sign_compact(b"hello", &k1, "K1").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let flattened = json!({
            "payload": parts[1],
            "protected": parts[0],
            "signature": parts[2],
        })
        .to_string();
        let jws = JwsMessage::parse(&flattened).unwrap();
        assert_eq!(jws.signatures().len(), 1);
        jws.verify_signature(&jws.signatures()[0], &verifying(K1_PEM))
            .unwrap();

        let general = json!({
            "payload": parts[1],
            "signatures": [
                {"protected": parts[0], "signature": parts[2]},
                {"protected": parts[0], "header": {"kid": "other"}, "signature": parts[2]},
            ]
        })
        .to_string();
        let jws = JwsMessage::parse(&general).unwrap();
        assert_eq!(jws.signatures().len(), 2);
        assert_eq!(jws.encoded_payload(), parts[1]);
    }

    #[test]
    fn test_kid_falls_back_to_unprotected_header() {
        let header = b64_encode(br#"{"alg":"RS256"}"#);
        let input = json!({
            "payload": b64_encode(b"x"),
            "protected": header,
            "header": {"kid": "K9"},
            "signature": b64_encode(b"sig"),
        })
        .to_string();
        let jws = JwsMessage::parse(&input).unwrap();
        assert_eq!(jws.signatures()[0].key_id(), Some("K9"));
    }

    #[test]
    fn test_none_and_hmac_are_refused() {
        let k1 = verifying(K1_PEM);
        for alg in ["none", "HS256"] {
            let header = b64_encode(format!(r#"{{"alg":"{alg}","kid":"K1"}}"#));
            let token = format!("{header}.{}.", b64_encode(b"x"));
            let jws = JwsMessage::parse(&token).unwrap();
            let err = jws.verify_signature(&jws.signatures()[0], &k1).unwrap_err();
            assert!(matches!(err, JoseError::UnsupportedAlgorithm(_)), "{alg}: {err:?}");
        }
    }

    #[test]
    fn test_es256_sign_then_verify() {
        let signing = p256::ecdsa::SigningKey::from_slice(&[0x11; 32]).unwrap();
        let token = sign_compact_es256(b"hello", &signing, "ec-1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        let sig = &jws.signatures()[0];
        assert_eq!(sig.algorithm(), Some("ES256"));
        assert_eq!(sig.signature().len(), 64);

        let key = VerifyingKey::from(signing.verifying_key().clone());
        jws.verify_signature(sig, &key).unwrap();

        let other = p256::ecdsa::SigningKey::from_slice(&[0x22; 32]).unwrap();
        let err = jws
            .verify_signature(sig, &VerifyingKey::from(other.verifying_key().clone()))
            .unwrap_err();
        assert!(matches!(err, JoseError::BadSignature));
    }

    #[test]
    fn test_es384_verifies() {
        let signing = p384::ecdsa::SigningKey::from_slice(&[0x33; 48]).unwrap();
        let header = JwsHeader {
            alg: Some("ES384".into()),
            kid: Some("ec-2".into()),
            ..JwsHeader::default()
        };
        let token = sign_compact_with(&header, b"hello", |input| {
            let signature: p384::ecdsa::Signature = Signer::sign(&signing, input);
            Ok(signature.to_bytes().to_vec())
        })
        .unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        jws.verify_signature(&jws.signatures()[0], &VerifyingKey::from(signing.verifying_key().clone()))
            .unwrap();
    }

    #[test]
    fn test_es512_verifies_against_p521_jwk() {
        let signing = p521::ecdsa::SigningKey::random(&mut rand::thread_rng());
        let point = p521::ecdsa::VerifyingKey::from(&signing).to_encoded_point(false);
        let jwk: crate::jose::Jwk = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "P-521",
            "kid": "ec-3",
            "alg": "ES512",
            "x": b64_encode(point.x().unwrap()),
            "y": b64_encode(point.y().unwrap()),
        }))
        .unwrap();

        let header = JwsHeader {
            alg: Some("ES512".into()),
            kid: Some("ec-3".into()),
            ..JwsHeader::default()
        };
        let token = sign_compact_with(&header, b"hello", |input| {
            let signature: p521::ecdsa::Signature = Signer::sign(&signing, input);
            Ok(signature.to_bytes().to_vec())
        })
        .unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        assert_eq!(jws.signatures()[0].signature().len(), 132);
        jws.verify_signature(&jws.signatures()[0], &jwk.to_verifying_key().unwrap())
            .unwrap();
    }

    #[test]
    fn test_algorithm_must_fit_key_type() {
        // RS256 signature checked against an EC key and the reverse
        let token = sign_compact(b"hello", &key(K1_PEM), "K1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        let ec = p256::ecdsa::SigningKey::from_slice(&[0x11; 32]).unwrap();
        let err = jws
            .verify_signature(&jws.signatures()[0], &VerifyingKey::from(ec.verifying_key().clone()))
            .unwrap_err();
        assert!(matches!(err, JoseError::KeyMismatch { ref alg, .. } if alg == "RS256"), "{err:?}");

        let token = sign_compact_es256(b"hello", &ec, "ec-1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        let err = jws
            .verify_signature(&jws.signatures()[0], &verifying(K1_PEM))
            .unwrap_err();
        assert!(matches!(err, JoseError::KeyMismatch { ref alg, .. } if alg == "ES256"), "{err:?}");
    }

    #[test]
    fn test_pinned_algorithm_rejects_others() {
        let token = sign_compact(b"hello", &key(K1_PEM), "K1").unwrap();
        let jws = JwsMessage::parse(&token).unwrap();
        let sig = &jws.signatures()[0];

        jws.verify_signature(sig, &verifying(K1_PEM).with_algorithm("RS256"))
            .unwrap();
        let err = jws
            .verify_signature(sig, &verifying(K1_PEM).with_algorithm("PS256"))
            .unwrap_err();
        assert!(matches!(err, JoseError::KeyMismatch { .. }), "{err:?}");
    }

    #[test]
    fn test_unprotected_alg_is_ignored() {
        // A valid RS256 signature whose protected header carries no alg
        let k1 = key(K1_PEM);
        let protected = b64_encode(br#"{"kid":"K1"}"#);
        let payload = b64_encode(b"hello");
        let input = format!("{protected}.{payload}");
        let signature = k1
            .sign(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(input.as_bytes()))
            .unwrap();
        let flattened = json!({
            "payload": payload,
            "protected": protected,
            "header": {"alg": "RS256"},
            "signature": b64_encode(signature),
        })
        .to_string();

        let jws = JwsMessage::parse(&flattened).unwrap();
        let sig = &jws.signatures()[0];
        assert_eq!(sig.algorithm(), None);
        assert_eq!(sig.unprotected_header().unwrap().alg.as_deref(), Some("RS256"));
        let err = jws.verify_signature(sig, &verifying(K1_PEM)).unwrap_err();
        assert!(matches!(err, JoseError::UnsupportedAlgorithm(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            JwsMessage::parse("a.b"),
            Err(JoseError::Format(_))
        ));
        assert!(matches!(
            JwsMessage::parse("not-base64!.eA.eA"),
            Err(JoseError::Base64("protected header"))
        ));
        assert!(matches!(
            JwsMessage::parse(&format!("{}.eA.eA", b64_encode(b"not json"))),
            Err(JoseError::Header(_))
        ));
        assert!(matches!(
            JwsMessage::parse(r#"{"payload":"eA","signature":"eA","signatures":[]}"#),
            Err(JoseError::Format(_))
        ));
    }
}
