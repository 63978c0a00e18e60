//! JSON Web Key (RFC 7517) as published by the provider's discovery endpoint

use std::fmt;

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use serde::{Deserialize, Serialize};

use super::{b64_decode, b64_encode};
use crate::error::JoseError;

/// JSON Web Key
///
/// Members this client does not use (`x5c`, `x5t`, ...) are ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key Type (RSA, EC, oct, OKP)
    pub kty: String,

    /// Key ID, the cache key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Public Key Use (sig, enc)
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm (RS256, PS256, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    // RSA parameters (kty = "RSA")
    /// RSA modulus (base64url encoded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    // EC parameters (kty = "EC")
    /// Curve name (P-256, P-384, P-521)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// JSON Web Key Set, `{"keys": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

impl Jwk {
    /// Describe an RSA public key as a signing JWK
    pub fn from_rsa_public_key(key: &RsaPublicKey, kid: impl Into<String>) -> Self {
        Self {
            kty: "RSA".to_string(),
            kid: Some(kid.into()),
            key_use: Some("sig".to_string()),
            alg: Some("RS256".to_string()),
            n: Some(b64_encode(key.n().to_bytes_be())),
            e: Some(b64_encode(key.e().to_bytes_be())),
            crv: None,
            x: None,
            y: None,
        }
    }

    /// Describe a P-256 public key as an ES256 signing JWK
    pub fn from_p256_public_key(key: &p256::ecdsa::VerifyingKey, kid: impl Into<String>) -> Self {
        let point = key.to_encoded_point(false);
        Self {
            kty: "EC".to_string(),
            kid: Some(kid.into()),
            key_use: Some("sig".to_string()),
            alg: Some("ES256".to_string()),
            n: None,
            e: None,
            crv: Some("P-256".to_string()),
            x: point.x().map(b64_encode),
            y: point.y().map(b64_encode),
        }
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Build the key used to check signatures, pinned to this JWK's `alg`
    ///
    /// # Errors
    ///
    /// [`JoseError::InvalidKey`] for key types other than `RSA` and `EC`,
    /// unknown curves, and missing or malformed parameters.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, JoseError> {
        let material = match self.kty.as_str() {
            "RSA" => KeyMaterial::Rsa(self.to_rsa_public_key()?),
            "EC" => self.to_ec_key()?,
            other => {
                return Err(JoseError::InvalidKey(format!("unsupported key type {other:?}")));
            }
        };
        Ok(VerifyingKey {
            material,
            alg: self.alg.clone().filter(|alg| !alg.is_empty()),
        })
    }

    fn to_ec_key(&self) -> Result<KeyMaterial, JoseError> {
        let crv = self
            .crv
            .as_deref()
            .ok_or_else(|| JoseError::InvalidKey("EC key missing 'crv' parameter".into()))?;
        let coordinate_len = match crv {
            "P-256" => 32,
            "P-384" => 48,
            "P-521" => 66,
            other => return Err(JoseError::InvalidKey(format!("unsupported curve {other:?}"))),
        };

        let mut sec1 = Vec::with_capacity(1 + 2 * coordinate_len);
        sec1.push(0x04);
        for (name, part, value) in [("x", "jwk x", &self.x), ("y", "jwk y", &self.y)] {
            let value = value
                .as_deref()
                .ok_or_else(|| JoseError::InvalidKey(format!("EC key missing '{name}' parameter")))?;
            let bytes = b64_decode(part, value)?;
            if bytes.len() > coordinate_len {
                return Err(JoseError::InvalidKey(format!(
                    "{crv} '{name}' exceeds {coordinate_len} bytes"
                )));
            }
            // Some encoders strip leading zero bytes
            sec1.resize(sec1.len() + coordinate_len - bytes.len(), 0);
            sec1.extend_from_slice(&bytes);
        }

        let invalid = || JoseError::InvalidKey(format!("{crv} point is not on the curve"));
        Ok(match crv {
            "P-256" => KeyMaterial::P256(
                p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| invalid())?,
            ),
            "P-384" => KeyMaterial::P384(
                p384::ecdsa::VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| invalid())?,
            ),
            _ => KeyMaterial::P521(
                p521::ecdsa::VerifyingKey::from_sec1_bytes(&sec1).map_err(|_| invalid())?,
            ),
        })
    }

    /// Rebuild the RSA public key from `n` and `e`
    ///
    /// # Errors
    ///
    /// [`JoseError::InvalidKey`] for non-RSA keys, missing or undecodable
    /// parameters, or parameters the RSA backend rejects.
    pub fn to_rsa_public_key(&self) -> Result<RsaPublicKey, JoseError> {
        if self.kty != "RSA" {
            return Err(JoseError::InvalidKey(format!(
                "unsupported key type {:?}",
                self.kty
            )));
        }
        let n = self
            .n
            .as_deref()
            .ok_or_else(|| JoseError::InvalidKey("RSA key missing 'n' parameter".into()))?;
        let e = self
            .e
            .as_deref()
            .ok_or_else(|| JoseError::InvalidKey("RSA key missing 'e' parameter".into()))?;

        let n = BigUint::from_bytes_be(&b64_decode("jwk n", n)?);
        let e = BigUint::from_bytes_be(&b64_decode("jwk e", e)?);
        RsaPublicKey::new(n, e).map_err(|e| JoseError::InvalidKey(e.to_string()))
    }
}

/// Public key material a signature can be checked against
pub enum KeyMaterial {
    Rsa(RsaPublicKey),
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl KeyMaterial {
    /// Short family name, as used in error messages
    pub fn family(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "RSA",
            Self::P256(_) => "EC P-256",
            Self::P384(_) => "EC P-384",
            Self::P521(_) => "EC P-521",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family())
    }
}

/// A public key ready for signature checks
///
/// When built from a JWK that names an `alg`, only that algorithm is
/// accepted.
#[derive(Debug)]
pub struct VerifyingKey {
    material: KeyMaterial,
    alg: Option<String>,
}

impl VerifyingKey {
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Algorithm the key is pinned to, if any
    pub fn algorithm(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    pub fn with_algorithm(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }
}

impl From<RsaPublicKey> for VerifyingKey {
    fn from(key: RsaPublicKey) -> Self {
        Self {
            material: KeyMaterial::Rsa(key),
            alg: None,
        }
    }
}

impl From<p256::ecdsa::VerifyingKey> for VerifyingKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        Self {
            material: KeyMaterial::P256(key),
            alg: None,
        }
    }
}

impl From<p384::ecdsa::VerifyingKey> for VerifyingKey {
    fn from(key: p384::ecdsa::VerifyingKey) -> Self {
        Self {
            material: KeyMaterial::P384(key),
            alg: None,
        }
    }
}
