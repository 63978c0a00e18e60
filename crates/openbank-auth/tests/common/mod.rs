//! Shared fixtures for authentication and webhook integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use openbank_auth::jose::{Jwk, jwe, jws};
use openbank_auth::{Authenticator, ClientIdentity, KeyCache, WebhookVerifier, parse_private_key};
use openbank_http::{HttpTransport, TransportConfig};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

pub const CLIENT_KEY_PEM: &str = include_str!("../fixtures/client_key.pem");
pub const PROVIDER_K1_PEM: &str = include_str!("../fixtures/provider_k1.pem");
pub const PROVIDER_K2_PEM: &str = include_str!("../fixtures/provider_k2.pem");

pub const CLIENT_ID: &str = "test-client";
pub const TOKEN_PATH: &str = "/auth/realms/stone_bank/protocol/openid-connect/token";
pub const DISCOVERY_PATH: &str = "/api/v1/discovery/keys";

pub fn private_key(pem: &str) -> RsaPrivateKey {
    parse_private_key(pem).expect("fixture key")
}

pub fn public_key(pem: &str) -> RsaPublicKey {
    private_key(pem).to_public_key()
}

pub fn jwk(pem: &str, kid: &str) -> Jwk {
    Jwk::from_rsa_public_key(&public_key(pem), kid)
}

pub fn discovery_body(keys: &[(&str, &str)]) -> Value {
    let keys: Vec<Jwk> = keys.iter().map(|(pem, kid)| jwk(pem, kid)).collect();
    json!({ "keys": keys })
}

/// Provider-style webhook: sign with `signer_pem` as `kid`, encrypt to `recipient`
pub fn webhook(payload: &[u8], signer_pem: &str, kid: &str, recipient: &RsaPublicKey) -> String {
    let signed = jws::sign_compact(payload, &private_key(signer_pem), kid).expect("sign");
    jwe::encrypt_compact(signed.as_bytes(), recipient).expect("encrypt")
}

/// JWT-shaped access token expiring `lifetime_secs` from now
pub fn access_token(lifetime_secs: i64) -> String {
    let claims = json!({ "exp": Utc::now().timestamp() + lifetime_secs, "sub": CLIENT_ID });
    jws::sign_compact(claims.to_string().as_bytes(), &private_key(PROVIDER_K1_PEM), "k1")
        .expect("sign")
}

pub fn token_response(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 300,
        "refresh_expires_in": 0,
        "not-before-policy": 0,
        "scope": "stone_subject_id"
    })
}

/// Mock provider plus a client wired to it
pub struct TestProvider {
    pub server: MockServer,
    pub identity: Arc<ClientIdentity>,
    pub transport: HttpTransport,
}

impl TestProvider {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).expect("mock server uri");
        let identity = ClientIdentity::new(CLIENT_ID, CLIENT_KEY_PEM, base.clone(), base)
            .expect("identity")
            .with_consent_redirect_url("https://merchant.example.com/consent");
        let transport = HttpTransport::new(TransportConfig::default()).expect("transport");
        Self {
            server,
            identity: Arc::new(identity),
            transport,
        }
    }

    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(Arc::clone(&self.identity), self.transport.clone())
    }

    pub fn key_cache(&self) -> Arc<KeyCache> {
        Arc::new(KeyCache::new(
            self.transport.clone(),
            self.identity.api_base_url().clone(),
        ))
    }

    pub fn verifier(&self) -> WebhookVerifier {
        WebhookVerifier::new(Arc::clone(&self.identity), self.key_cache())
    }

    pub fn client_public_key(&self) -> RsaPublicKey {
        self.identity.public_key()
    }
}
