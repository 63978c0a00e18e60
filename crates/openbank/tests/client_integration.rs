mod common;

use common::{CONSENT_REDIRECT, TestBank};
use openbank::types::{Target, TransferAccount, TransferInput};
use openbank::{Client, ClientConfig, Error, WebhookError};
use openbank_auth::test_utils::{
    CLIENT_KEY_PEM, K1_KID, K2_KID, PROVIDER_K1_PEM, PROVIDER_K2_PEM, TEST_CLIENT_ID,
    discovery_body, webhook, webhook_body,
};
use openbank_auth::{DISCOVERY_PATH, TOKEN_PATH};
use openbank_http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_resource_calls_share_one_token_exchange() {
    let bank = TestBank::without_token_endpoint().await;
    bank.mount_token_endpoint(Some(1)).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/acc-1/balance"))
        .and(header("authorization", bank.bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": 12_500,
            "blocked_balance": 0,
            "scheduled_balance": 300
        })))
        .expect(2)
        .mount(&bank.server)
        .await;

    let first = bank.client.accounts().balance("acc-1").await.unwrap();
    let second = bank.client.accounts().balance("acc-1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.balance, 12_500);
    assert_eq!(first.scheduled_balance, 300);
    assert!(bank.client.authenticator().is_authenticated());
}

#[tokio::test]
async fn test_user_agent_carries_caller_prefix() {
    let bank = TestBank::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acc-1"})))
        .mount(&bank.server)
        .await;

    bank.client.accounts().get("acc-1").await.unwrap();

    let requests = bank.api_requests().await;
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("openbank-tests/1.0 openbank-rust/"), "{agent}");
}

#[tokio::test]
async fn test_unauthorized_response_forces_new_exchange() {
    // GIVEN an API that rejects the first bearer token
    let bank = TestBank::without_token_endpoint().await;
    bank.mount_token_endpoint(Some(2)).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/acc-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token revoked",
            "request_id": "req-401"
        })))
        .up_to_n_times(1)
        .mount(&bank.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "acc-1"})))
        .mount(&bank.server)
        .await;

    // WHEN the call fails and is retried by the caller
    let err = bank.client.accounts().get("acc-1").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.request_id(), Some("req-401"));
    assert!(!bank.client.authenticator().is_authenticated());

    // THEN the retry exchanges a fresh token before calling again
    let account = bank.client.accounts().get("acc-1").await.unwrap();
    assert_eq!(account.id, "acc-1");
}

#[tokio::test]
async fn test_token_endpoint_failure_is_an_auth_error() {
    let bank = TestBank::without_token_endpoint().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Invalid client credentials"
        })))
        .mount(&bank.server)
        .await;

    let err = bank.client.accounts().list().await.unwrap_err();

    assert!(matches!(err, Error::Auth(_)), "{err:?}");
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(bank.api_requests().await.is_empty());
}

#[tokio::test]
async fn test_api_error_body_is_decoded() {
    let bank = TestBank::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/internal_transfers"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "type": "srn:error:validation",
            "message": "insufficient balance",
            "request_id": "req-422",
            "reason": [{"error": "insufficient_balance", "path": ["amount"]}]
        })))
        .mount(&bank.server)
        .await;

    let input = TransferInput {
        account_id: "acc-1".into(),
        amount: 1_000,
        target: Target {
            account: TransferAccount {
                account_code: "99999".into(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let err = bank.client.transfers().transfer(&input, "key-1").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.request_id(), Some("req-422"));
    assert!(err.provider_error().is_some());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_network() {
    let bank = TestBank::start().await;

    let err = bank
        .client
        .transfers()
        .transfer(&TransferInput::default(), "key-1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "{err:?}");

    let err = bank.client.payment_links().get(" ", "order-1").await.unwrap_err();
    assert!(matches!(err, Error::Validation(ref m) if m == "account_id can't be empty"));

    let requests = bank.server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "unexpected requests: {requests:?}");
}

#[tokio::test]
async fn test_idempotency_key_too_long_is_rejected() {
    let bank = TestBank::start().await;
    let input = TransferInput {
        account_id: "acc-1".into(),
        amount: 1_000,
        target: Target {
            account: TransferAccount {
                account_code: "99999".into(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };

    let err = bank
        .client
        .transfers()
        .dry_run(&input, &"k".repeat(73))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "{err:?}");
    assert!(bank.api_requests().await.is_empty());
}

#[tokio::test]
async fn test_verify_webhook_through_client() {
    let bank = TestBank::start().await;
    Mock::given(method("GET"))
        .and(path(DISCOVERY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(discovery_body(&[(PROVIDER_K1_PEM, K1_KID)])),
        )
        .expect(1)
        .mount(&bank.server)
        .await;

    let recipient = bank.client.identity().public_key();
    let payload = json!({"event": "pix.received", "amount": 1500});
    let body = webhook_body(payload.to_string().as_bytes(), PROVIDER_K1_PEM, K1_KID, &recipient);

    let verified: serde_json::Value = bank.client.verify_webhook_json(&body).await.unwrap();
    assert_eq!(verified, payload);

    let encrypted = webhook(b"second", PROVIDER_K1_PEM, K1_KID, &recipient);
    assert_eq!(bank.client.decrypt_webhook(&encrypted).await.unwrap(), b"second");
    assert_eq!(bank.client.provider_keys().key_ids(), vec![K1_KID.to_string()]);
}

#[tokio::test]
async fn test_webhook_from_unknown_key_is_rejected() {
    let bank = TestBank::start().await;
    Mock::given(method("GET"))
        .and(path(DISCOVERY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(discovery_body(&[(PROVIDER_K1_PEM, K1_KID)])),
        )
        .mount(&bank.server)
        .await;

    let recipient = bank.client.identity().public_key();
    let body = webhook_body(b"{}", PROVIDER_K2_PEM, K2_KID, &recipient);

    let err = bank.client.verify_webhook(&body).await.unwrap_err();
    assert!(
        matches!(err, Error::Webhook(WebhookError::KeyNotFound { ref kid }) if kid == K2_KID),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_consent_link_is_built_offline() {
    let bank = TestBank::start().await;

    let link = bank.client.consent_link(Some("session-42")).unwrap();

    assert_eq!(link.session_id, "session-42");
    assert_eq!(link.url.fragment().map(|f| f.starts_with("/consent?type=consent")), Some(true));
    assert!(link.url.as_str().contains(&format!("client_id={TEST_CLIENT_ID}")));
    assert!(bank.server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        bank.client.identity().consent_redirect_url(),
        Some(CONSENT_REDIRECT)
    );
}

#[test]
fn test_client_rejects_bad_configuration() {
    let err = Client::new(ClientConfig::new(TEST_CLIENT_ID, "not a pem")).unwrap_err();
    assert!(matches!(err, Error::Auth(_)), "{err:?}");

    let err = Client::new(ClientConfig::new("", CLIENT_KEY_PEM)).unwrap_err();
    assert!(matches!(err, Error::Auth(_)), "{err:?}");

    let config = ClientConfig::builder(TEST_CLIENT_ID, CLIENT_KEY_PEM)
        .api_base_url("ftp://api.example.com")
        .build();
    assert!(matches!(Client::new(config), Err(Error::Config(_))));
}

#[test]
fn test_debug_output_hides_secrets() {
    let client = Client::new(ClientConfig::new(TEST_CLIENT_ID, CLIENT_KEY_PEM)).unwrap();
    let rendered = format!("{client:?}");
    assert!(rendered.contains(TEST_CLIENT_ID));
    assert!(!rendered.contains("PRIVATE KEY"));
}
