//! JSON Web Encryption (RFC 7516)
//!
//! Key management: `RSA-OAEP`, `RSA-OAEP-256`.
//! Content encryption: `A128GCM`, `A192GCM`, `A256GCM`, and the RFC 7518
//! §5.2 composites `A128CBC-HS256`, `A192CBC-HS384`, `A256CBC-HS512`.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{b64_decode, b64_encode};
use crate::error::JoseError;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Content encryption algorithms (`enc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncryption {
    A128Gcm,
    A192Gcm,
    A256Gcm,
    A128CbcHs256,
    A192CbcHs384,
    A256CbcHs512,
}

impl ContentEncryption {
    pub const ALL: [Self; 6] = [
        Self::A128Gcm,
        Self::A192Gcm,
        Self::A256Gcm,
        Self::A128CbcHs256,
        Self::A192CbcHs384,
        Self::A256CbcHs512,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|enc| enc.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::A128Gcm => "A128GCM",
            Self::A192Gcm => "A192GCM",
            Self::A256Gcm => "A256GCM",
            Self::A128CbcHs256 => "A128CBC-HS256",
            Self::A192CbcHs384 => "A192CBC-HS384",
            Self::A256CbcHs512 => "A256CBC-HS512",
        }
    }

    /// Content encryption key length in bytes
    ///
    /// The CBC composites split theirs in half: MAC key first, then the AES key.
    pub const fn key_len(self) -> usize {
        match self {
            Self::A128Gcm => 16,
            Self::A192Gcm => 24,
            Self::A256Gcm | Self::A128CbcHs256 => 32,
            Self::A192CbcHs384 => 48,
            Self::A256CbcHs512 => 64,
        }
    }

    pub const fn iv_len(self) -> usize {
        if self.is_gcm() { 12 } else { 16 }
    }

    pub const fn tag_len(self) -> usize {
        if self.is_gcm() { 16 } else { self.key_len() / 2 }
    }

    const fn is_gcm(self) -> bool {
        matches!(self, Self::A128Gcm | Self::A192Gcm | Self::A256Gcm)
    }

    /// Decrypt and authenticate; the tag is checked before any plaintext is produced
    fn open(
        self,
        cek: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, JoseError> {
        if cek.len() != self.key_len() {
            return Err(JoseError::KeyUnwrap);
        }
        if self.is_gcm() {
            let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
            sealed.extend_from_slice(ciphertext);
            sealed.extend_from_slice(tag);
            let payload = Payload { msg: &sealed, aad };
            let nonce = Nonce::<U12>::from_slice(iv);
            let opened = match self {
                Self::A128Gcm => Aes128Gcm::new_from_slice(cek).map(|c| c.decrypt(nonce, payload)),
                Self::A192Gcm => Aes192Gcm::new_from_slice(cek).map(|c| c.decrypt(nonce, payload)),
                _ => Aes256Gcm::new_from_slice(cek).map(|c| c.decrypt(nonce, payload)),
            };
            return opened
                .map_err(|_| JoseError::KeyUnwrap)?
                .map_err(|_| JoseError::Decryption);
        }

        let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
        let expected = self.cbc_tag(mac_key, aad, iv, ciphertext)?;
        if !bool::from(expected.ct_eq(tag)) {
            return Err(JoseError::Decryption);
        }
        let plaintext = match self {
            Self::A128CbcHs256 => cbc::Decryptor::<Aes128>::new_from_slices(enc_key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
            Self::A192CbcHs384 => cbc::Decryptor::<Aes192>::new_from_slices(enc_key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
            _ => cbc::Decryptor::<Aes256>::new_from_slices(enc_key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
        };
        plaintext
            .map_err(|_| JoseError::KeyUnwrap)?
            .map_err(|_| JoseError::Decryption)
    }

    /// Encrypt, returning `(ciphertext, tag)`
    fn seal(
        self,
        cek: &[u8],
        iv: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<(Vec<u8>, Vec<u8>), JoseError> {
        let failed = |e: &dyn std::fmt::Display| JoseError::Encryption(e.to_string());
        if self.is_gcm() {
            let payload = Payload { msg: plaintext, aad };
            let nonce = Nonce::<U12>::from_slice(iv);
            let mut sealed = match self {
                Self::A128Gcm => Aes128Gcm::new_from_slice(cek).map(|c| c.encrypt(nonce, payload)),
                Self::A192Gcm => Aes192Gcm::new_from_slice(cek).map(|c| c.encrypt(nonce, payload)),
                _ => Aes256Gcm::new_from_slice(cek).map(|c| c.encrypt(nonce, payload)),
            }
            .map_err(|e| failed(&e))?
            .map_err(|e| failed(&e))?;
            let tag = sealed.split_off(sealed.len() - self.tag_len());
            return Ok((sealed, tag));
        }

        let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
        let ciphertext = match self {
            Self::A128CbcHs256 => cbc::Encryptor::<Aes128>::new_from_slices(enc_key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            Self::A192CbcHs384 => cbc::Encryptor::<Aes192>::new_from_slices(enc_key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            _ => cbc::Encryptor::<Aes256>::new_from_slices(enc_key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        }
        .map_err(|e| failed(&e))?;
        let tag = self.cbc_tag(mac_key, aad, iv, &ciphertext)?;
        Ok((ciphertext, tag))
    }

    /// Leading half of `HMAC(MAC_KEY, A || IV || E || AL)`, AL being the
    /// bit length of A as a 64-bit big-endian integer
    fn cbc_tag(
        self,
        mac_key: &[u8],
        aad: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, JoseError> {
        let al = (aad.len() as u64 * 8).to_be_bytes();
        let parts = [aad, iv, ciphertext, al.as_slice()];
        let mut full = match self {
            Self::A128CbcHs256 => hmac_sha2::<Hmac<Sha256>>(mac_key, &parts)?,
            Self::A192CbcHs384 => hmac_sha2::<Hmac<Sha384>>(mac_key, &parts)?,
            _ => hmac_sha2::<Hmac<Sha512>>(mac_key, &parts)?,
        };
        full.truncate(self.tag_len());
        Ok(full)
    }
}

fn hmac_sha2<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, JoseError> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| JoseError::KeyUnwrap)?;
    for part in parts {
        Mac::update(&mut mac, part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

/// JOSE header members relevant to decryption
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl JweHeader {
    /// Fill members missing here from a lower-precedence header
    fn merge(mut self, other: Option<JweHeader>) -> Self {
        if let Some(other) = other {
            self.alg = self.alg.or(other.alg);
            self.enc = self.enc.or(other.enc);
            self.kid = self.kid.or(other.kid);
            self.zip = self.zip.or(other.zip);
            self.cty = self.cty.or(other.cty);
            self.typ = self.typ.or(other.typ);
        }
        self
    }
}

/// A parsed single-recipient JWE
#[derive(Debug, Clone)]
pub struct JweMessage {
    protected_b64: String,
    header: JweHeader,
    aad_b64: Option<String>,
    encrypted_key: Vec<u8>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
}

#[derive(Deserialize)]
struct JsonSerialization {
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    unprotected: Option<JweHeader>,
    #[serde(default)]
    recipients: Option<Vec<JsonRecipient>>,
    #[serde(flatten)]
    flattened: JsonRecipient,
    #[serde(default)]
    aad: Option<String>,
    #[serde(default)]
    iv: Option<String>,
    ciphertext: String,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Deserialize)]
struct JsonRecipient {
    #[serde(default)]
    header: Option<JweHeader>,
    #[serde(default)]
    encrypted_key: Option<String>,
}

impl JweMessage {
    /// Parse compact or JSON serialization
    ///
    /// # Errors
    ///
    /// [`JoseError`] when the input matches neither serialization, a segment
    /// fails to decode, or the JSON form names other than one recipient.
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
        let [protected, encrypted_key, iv, ciphertext, tag] = parts.as_slice() else {
            return Err(JoseError::Format(format!(
                "compact JWE: expected 5 segments, found {}",
                parts.len()
            )));
        };
        if protected.is_empty() {
            return Err(JoseError::Format("compact JWE: empty protected header".into()));
        }
        Ok(Self {
            header: serde_json::from_slice(&b64_decode("protected header", protected)?)?,
            protected_b64: (*protected).to_string(),
            aad_b64: None,
            encrypted_key: b64_decode("encrypted key", encrypted_key)?,
            iv: b64_decode("iv", iv)?,
            ciphertext: b64_decode("ciphertext", ciphertext)?,
            tag: b64_decode("tag", tag)?,
        })
    }

    fn parse_json(input: &str) -> Result<Self, JoseError> {
        let json: JsonSerialization = serde_json::from_str(input)?;

        let recipient = match json.recipients {
            Some(mut list) if list.len() == 1 => list.remove(0),
            Some(list) => {
                return Err(JoseError::Format(format!(
                    "JSON JWE: expected exactly one recipient, found {}",
                    list.len()
                )));
            }
            None => json.flattened,
        };

        let protected_b64 = json.protected.unwrap_or_default();
        let protected = if protected_b64.is_empty() {
            JweHeader::default()
        } else {
            serde_json::from_slice(&b64_decode("protected header", &protected_b64)?)?
        };
        let header = protected.merge(json.unprotected).merge(recipient.header);

        let decode_opt = |part: &'static str, value: Option<String>| match value {
            Some(v) => b64_decode(part, &v),
            None => Ok(Vec::new()),
        };

        Ok(Self {
            protected_b64,
            header,
            aad_b64: json.aad,
            encrypted_key: decode_opt("encrypted key", recipient.encrypted_key)?,
            iv: decode_opt("iv", json.iv)?,
            ciphertext: b64_decode("ciphertext", &json.ciphertext)?,
            tag: decode_opt("tag", json.tag)?,
        })
    }

    /// Effective header: protected, then shared unprotected, then per-recipient
    pub fn header(&self) -> &JweHeader {
        &self.header
    }

    fn additional_data(&self) -> Vec<u8> {
        match &self.aad_b64 {
            Some(aad) => format!("{}.{}", self.protected_b64, aad).into_bytes(),
            None => self.protected_b64.clone().into_bytes(),
        }
    }

    /// Unwrap the content key with `key` and decrypt the ciphertext
    ///
    /// # Errors
    ///
    /// - [`JoseError::UnsupportedAlgorithm`] for unknown `alg`/`enc` or any `zip`
    /// - [`JoseError::KeyUnwrap`] when the content key was not encrypted to
    ///   `key` or has the wrong length for `enc`
    /// - [`JoseError::Decryption`] when the ciphertext, tag or AAD was altered
    /// - [`JoseError::Format`] for IV or tag lengths `enc` cannot use
    pub fn decrypt(&self, key: &RsaPrivateKey) -> Result<Vec<u8>, JoseError> {
        if let Some(zip) = &self.header.zip {
            return Err(JoseError::UnsupportedAlgorithm(format!("zip {zip}")));
        }
        let alg = self.header.alg.as_deref().unwrap_or_default();
        let enc_name = self.header.enc.as_deref().unwrap_or_default();
        let oaep = match alg {
            "RSA-OAEP" => Oaep::new::<Sha1>(),
            "RSA-OAEP-256" => Oaep::new::<Sha256>(),
            other => return Err(JoseError::UnsupportedAlgorithm(other.to_string())),
        };
        let enc = ContentEncryption::from_name(enc_name)
            .ok_or_else(|| JoseError::UnsupportedAlgorithm(enc_name.to_string()))?;

        let cek = Zeroizing::new(
            key.decrypt(oaep, &self.encrypted_key)
                .map_err(|_| JoseError::KeyUnwrap)?,
        );

        if self.iv.len() != enc.iv_len() {
            return Err(JoseError::Format(format!(
                "JWE: {} iv must be {} bytes, found {}",
                enc.name(),
                enc.iv_len(),
                self.iv.len()
            )));
        }
        if self.tag.len() != enc.tag_len() {
            return Err(JoseError::Format(format!(
                "JWE: {} tag must be {} bytes, found {}",
                enc.name(),
                enc.tag_len(),
                self.tag.len()
            )));
        }

        enc.open(&cek, &self.iv, &self.ciphertext, &self.tag, &self.additional_data())
    }
}

/// Encrypt `plaintext` to `recipient` as an `RSA-OAEP-256` / `A256GCM` compact JWE
///
/// # Errors
///
/// [`JoseError::Encryption`] if key wrapping or sealing fails.
pub fn encrypt_compact(plaintext: &[u8], recipient: &RsaPublicKey) -> Result<String, JoseError> {
    encrypt_compact_with(plaintext, recipient, ContentEncryption::A256Gcm)
}

/// Encrypt `plaintext` to `recipient` as an `RSA-OAEP-256` compact JWE using `enc`
///
/// # Errors
///
/// [`JoseError::Encryption`] if key wrapping or sealing fails.
pub fn encrypt_compact_with(
    plaintext: &[u8],
    recipient: &RsaPublicKey,
    enc: ContentEncryption,
) -> Result<String, JoseError> {
    let header = JweHeader {
        alg: Some("RSA-OAEP-256".to_string()),
        enc: Some(enc.name().to_string()),
        cty: Some("JWT".to_string()),
        ..JweHeader::default()
    };
    let protected_b64 = b64_encode(serde_json::to_vec(&header)?);

    let mut rng = rand::thread_rng();
    let mut cek = Zeroizing::new(vec![0u8; enc.key_len()]);
    rng.fill_bytes(&mut cek);
    let mut iv = vec![0u8; enc.iv_len()];
    rng.fill_bytes(&mut iv);

    let encrypted_key = recipient
        .encrypt(&mut rng, Oaep::new::<Sha256>(), &cek)
        .map_err(|e| JoseError::Encryption(e.to_string()))?;
    let (ciphertext, tag) = enc.seal(&cek, &iv, plaintext, protected_b64.as_bytes())?;

    Ok(format!(
        "{}.{}.{}.{}.{}",
        protected_b64,
        b64_encode(encrypted_key),
        b64_encode(iv),
        b64_encode(ciphertext),
        b64_encode(tag)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::DecodeRsaPrivateKey;
    use rsa::pkcs8::DecodePrivateKey;
    use serde_json::json;

    const CLIENT_PEM: &str = include_str!("../../tests/fixtures/client_key.pem");
    const OTHER_PEM: &str = include_str!("../../tests/fixtures/provider_k1.pem");

    fn client_key() -> RsaPrivateKey {
        RsaPrivateKey::from_pkcs1_pem(CLIENT_PEM).unwrap()
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let key = client_key();
        let token = encrypt_compact(b"secret body", &key.to_public_key()).unwrap();
        let jwe = JweMessage::parse(&token).unwrap();
        assert_eq!(jwe.header().alg.as_deref(), Some("RSA-OAEP-256"));
        assert_eq!(jwe.decrypt(&key).unwrap(), b"secret body");
    }

    #[test]
    fn test_every_content_encryption_round_trips() {
        let key = client_key();
        for enc in ContentEncryption::ALL {
            let token = encrypt_compact_with(b"secret body", &key.to_public_key(), enc).unwrap();
            let jwe = JweMessage::parse(&token).unwrap();
            assert_eq!(jwe.header().enc.as_deref(), Some(enc.name()));
            assert_eq!(jwe.iv.len(), enc.iv_len());
            assert_eq!(jwe.tag.len(), enc.tag_len());
            assert_eq!(jwe.decrypt(&key).unwrap(), b"secret body", "{}", enc.name());
        }
    }

    #[test]
    fn test_cbc_hmac_tag_layout() {
        // Tag is the leading 16 bytes of HMAC-SHA256(MAC_KEY, A || IV || E || AL)
        let cek: Vec<u8> = (0u8..32).collect();
        let iv = [0x42; 16];
        let aad = b"eyJhbGciOiJSU0EtT0FFUCJ9";
        let (ciphertext, tag) = ContentEncryption::A128CbcHs256
            .seal(&cek, &iv, b"Live long and prosper.", aad)
            .unwrap();
        assert_eq!(ciphertext.len(), 32);

        let mut mac = <Hmac<Sha256> as KeyInit>::new_from_slice(&cek[..16]).unwrap();
        Mac::update(&mut mac, aad);
        Mac::update(&mut mac, &iv);
        Mac::update(&mut mac, &ciphertext);
        Mac::update(&mut mac, &(aad.len() as u64 * 8).to_be_bytes());
        let full = mac.finalize().into_bytes();
        assert_eq!(tag, &full[..16]);

        let plaintext = cbc::Decryptor::<Aes128>::new_from_slices(&cek[16..], &iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .unwrap();
        assert_eq!(plaintext, b"Live long and prosper.");
    }

    #[test]
    fn test_cbc_tampering_is_detected() {
        let key = client_key();
        for enc in [
            ContentEncryption::A128CbcHs256,
            ContentEncryption::A256CbcHs512,
        ] {
            let token = encrypt_compact_with(b"secret body", &key.to_public_key(), enc).unwrap();
            for segment in [2, 3, 4] {
                let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
                let mut bytes = b64_decode("segment", &parts[segment]).unwrap();
                bytes[0] ^= 0x01;
                parts[segment] = b64_encode(bytes);

                let err = JweMessage::parse(&parts.join("."))
                    .unwrap()
                    .decrypt(&key)
                    .unwrap_err();
                assert!(matches!(err, JoseError::Decryption), "{} segment {segment}", enc.name());
            }
        }
    }

    #[test]
    fn test_iv_length_must_fit_enc() {
        let key = client_key();
        let token = encrypt_compact_with(b"x", &key.to_public_key(), ContentEncryption::A128CbcHs256)
            .unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        parts[2] = b64_encode([0u8; 12]);
        let err = JweMessage::parse(&parts.join("."))
            .unwrap()
            .decrypt(&key)
            .unwrap_err();
        assert!(matches!(err, JoseError::Format(_)), "{err:?}");
    }

    #[test]
    fn test_wrong_recipient_fails_key_unwrap() {
        let token = encrypt_compact(b"secret", &client_key().to_public_key()).unwrap();
        let other = RsaPrivateKey::from_pkcs8_pem(OTHER_PEM).unwrap();
        let err = JweMessage::parse(&token).unwrap().decrypt(&other).unwrap_err();
        assert!(matches!(err, JoseError::KeyUnwrap));
    }

    #[test]
    fn test_tampered_ciphertext_fails_decryption() {
        let key = client_key();
        let token = encrypt_compact(b"secret body", &key.to_public_key()).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        let mut ciphertext = b64_decode("ciphertext", &parts[3]).unwrap();
        ciphertext[0] ^= 0x01;
        parts[3] = b64_encode(ciphertext);

        let err = JweMessage::parse(&parts.join("."))
            .unwrap()
            .decrypt(&key)
            .unwrap_err();
        assert!(matches!(err, JoseError::Decryption));
    }

    #[test]
    fn test_tampered_header_fails_decryption() {
        // the protected header is the AAD
        let key = client_key();
        let token = encrypt_compact(b"secret body", &key.to_public_key()).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        parts[0] = b64_encode(br#"{"alg":"RSA-OAEP-256","enc":"A256GCM"}"#);

        let err = JweMessage::parse(&parts.join("."))
            .unwrap()
            .decrypt(&key)
            .unwrap_err();
        assert!(matches!(err, JoseError::Decryption));
    }

    #[test]
    fn test_flattened_json_form() {
        let key = client_key();
        let token = encrypt_compact(b"json form", &key.to_public_key()).unwrap();
        let p: Vec<&str> = token.split('.').collect();
        let flattened = json!({
            "protected": p[0],
            "encrypted_key": p[1],
            "iv": p[2],
            "ciphertext": p[3],
            "tag": p[4],
        })
        .to_string();
        assert_eq!(
            JweMessage::parse(&flattened).unwrap().decrypt(&key).unwrap(),
            b"json form"
        );

        let general = json!({
            "protected": p[0],
            "recipients": [{"encrypted_key": p[1]}],
            "iv": p[2],
            "ciphertext": p[3],
            "tag": p[4],
        })
        .to_string();
        assert_eq!(
            JweMessage::parse(&general).unwrap().decrypt(&key).unwrap(),
            b"json form"
        );
    }

    #[test]
    fn test_multiple_recipients_rejected() {
        let input = json!({
            "protected": b64_encode(br#"{"enc":"A256GCM"}"#),
            "recipients": [{"encrypted_key": "eA"}, {"encrypted_key": "eA"}],
            "iv": "eA",
            "ciphertext": "eA",
            "tag": "eA",
        })
        .to_string();
        assert!(matches!(JweMessage::parse(&input), Err(JoseError::Format(_))));
    }

    #[test]
    fn test_malformed_and_unsupported() {
        assert!(matches!(
            JweMessage::parse("a.b.c"),
            Err(JoseError::Format(_))
        ));

        let header = b64_encode(br#"{"alg":"RSA1_5","enc":"A256GCM"}"#);
        let token = format!("{header}.eA.eA.eA.eA");
        let err = JweMessage::parse(&token)
            .unwrap()
            .decrypt(&client_key())
            .unwrap_err();
        assert!(matches!(err, JoseError::UnsupportedAlgorithm(alg) if alg == "RSA1_5"));

        let header = b64_encode(br#"{"alg":"RSA-OAEP","enc":"A256GCM","zip":"DEF"}"#);
        let token = format!("{header}.eA.eA.eA.eA");
        let err = JweMessage::parse(&token)
            .unwrap()
            .decrypt(&client_key())
            .unwrap_err();
        assert!(matches!(err, JoseError::UnsupportedAlgorithm(_)));
    }
}
