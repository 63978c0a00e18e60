//! Fixtures for testing code that authenticates or receives webhooks
//!
//! Available with the `test-utils` feature. The keys are static, publicly
//! known test keys; never use them outside tests.

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use url::Url;

use crate::identity::{ClientIdentity, parse_private_key};
use crate::jose::{Jwk, jwe, jws};

/// The client's own key, PKCS#1 PEM
pub const CLIENT_KEY_PEM: &str = include_str!("../tests/fixtures/client_key.pem");

/// A provider signing key, PKCS#8 PEM
pub const PROVIDER_K1_PEM: &str = include_str!("../tests/fixtures/provider_k1.pem");

/// A second provider signing key, PKCS#8 PEM
pub const PROVIDER_K2_PEM: &str = include_str!("../tests/fixtures/provider_k2.pem");

pub const K1_KID: &str = "k1";
pub const K2_KID: &str = "k2";

pub const TEST_CLIENT_ID: &str = "test-client";

/// # Panics
///
/// If `pem` is not an RSA private key.
pub fn private_key(pem: &str) -> RsaPrivateKey {
    parse_private_key(pem).expect("fixture PEM is a valid RSA key")
}

pub fn public_key(pem: &str) -> RsaPublicKey {
    private_key(pem).to_public_key()
}

/// Identity for [`TEST_CLIENT_ID`] using [`CLIENT_KEY_PEM`], with both base
/// URLs pointed at `base` (a mock server, typically)
///
/// # Panics
///
/// If `base` is not an absolute http(s) URL.
pub fn identity(base: &str) -> ClientIdentity {
    let base = Url::parse(base).expect("absolute base URL");
    ClientIdentity::new(TEST_CLIENT_ID, CLIENT_KEY_PEM, base.clone(), base)
        .expect("fixture identity is valid")
}

/// Public JWK of a provider key
pub fn jwk(pem: &str, kid: &str) -> Jwk {
    Jwk::from_rsa_public_key(&public_key(pem), kid)
}

/// Discovery endpoint body publishing `keys`
pub fn discovery_body(keys: &[(&str, &str)]) -> Value {
    let keys: Vec<Jwk> = keys.iter().map(|(pem, kid)| jwk(pem, kid)).collect();
    json!({ "keys": keys })
}

/// Compact JWS over `payload`, signed with `signer_pem` and labelled `kid`
///
/// # Panics
///
/// If the signing operation fails.
pub fn sign(payload: &[u8], signer_pem: &str, kid: &str) -> String {
    jws::sign_compact(payload, &private_key(signer_pem), kid).expect("signing succeeds")
}

/// A webhook as the provider sends it: `payload` signed with `signer_pem`
/// under `kid`, then encrypted to `recipient`
///
/// # Panics
///
/// If signing or encryption fails.
pub fn webhook(payload: &[u8], signer_pem: &str, kid: &str, recipient: &RsaPublicKey) -> String {
    let signed = sign(payload, signer_pem, kid);
    jwe::encrypt_compact(signed.as_bytes(), recipient).expect("encryption succeeds")
}

/// [`webhook`] wrapped in the `{"encrypted_body": ...}` envelope
pub fn webhook_body(payload: &[u8], signer_pem: &str, kid: &str, recipient: &RsaPublicKey) -> Vec<u8> {
    json!({ "encrypted_body": webhook(payload, signer_pem, kid, recipient) })
        .to_string()
        .into_bytes()
}

/// Compact JWT-shaped token whose payload carries `exp`
pub fn access_token_with_exp(exp: i64) -> String {
    sign(
        json!({ "exp": exp, "sub": TEST_CLIENT_ID }).to_string().as_bytes(),
        PROVIDER_K1_PEM,
        K1_KID,
    )
}

/// Token endpoint success body for a token expiring at `exp`
pub fn token_response(exp: i64) -> Value {
    json!({
        "access_token": access_token_with_exp(exp),
        "token_type": "bearer",
        "expires_in": 300,
        "refresh_expires_in": 0,
        "not-before-policy": 0,
        "scope": "stone_subject_id"
    })
}
