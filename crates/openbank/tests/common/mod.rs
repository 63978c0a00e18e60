//! Shared helpers for client integration tests

#![allow(dead_code)]

use chrono::Utc;
use openbank::{Client, ClientConfig};
use openbank_auth::test_utils::{CLIENT_KEY_PEM, TEST_CLIENT_ID, token_response};
use openbank_auth::TOKEN_PATH;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CONSENT_REDIRECT: &str = "https://merchant.example.com/consent";

/// Mock provider serving both the token endpoint and the API, plus a client pointed at it
pub struct TestBank {
    pub server: MockServer,
    pub client: Client,
    pub token: String,
}

impl TestBank {
    /// Start a provider whose token endpoint may be hit any number of times
    pub async fn start() -> Self {
        let bank = Self::without_token_endpoint().await;
        bank.mount_token_endpoint(None).await;
        bank
    }

    /// Start a provider with nothing mounted
    pub async fn without_token_endpoint() -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::builder(TEST_CLIENT_ID, CLIENT_KEY_PEM)
            .base_url(server.uri())
            .consent_redirect_url(CONSENT_REDIRECT)
            .user_agent("openbank-tests/1.0")
            .build();
        let client = Client::new(config).expect("client");
        let body = token_response(Utc::now().timestamp() + 3600);
        let token = body["access_token"].as_str().expect("token").to_string();
        Self {
            server,
            client,
            token,
        }
    }

    /// Mount the token endpoint, optionally asserting how often it is called
    pub async fn mount_token_endpoint(&self, expected: Option<u64>) {
        let mock = Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.token_body()));
        let mock = match expected {
            Some(n) => mock.expect(n),
            None => mock,
        };
        mock.mount(&self.server).await;
    }

    pub fn token_body(&self) -> serde_json::Value {
        serde_json::json!({
            "access_token": self.token,
            "token_type": "bearer",
            "expires_in": 3600
        })
    }

    /// Expected `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Requests that reached the API, token exchanges excluded
    pub async fn api_requests(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() != TOKEN_PATH)
            .collect()
    }
}
