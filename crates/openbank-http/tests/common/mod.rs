//! Shared helpers for transport integration tests

#![allow(dead_code)]

use openbank_http::{HttpTransport, TransportConfig, Url};
use wiremock::MockServer;

/// Mock provider plus a transport pointed at it
pub struct TestApi {
    pub server: MockServer,
    pub base: Url,
    pub transport: HttpTransport,
}

impl TestApi {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&server.uri()).expect("mock server uri");
        let transport = HttpTransport::new(TransportConfig::default().with_user_agent_prefix("tests/1.0"))
            .expect("transport");
        Self {
            server,
            base,
            transport,
        }
    }
}
