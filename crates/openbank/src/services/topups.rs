use openbank_http::Method;
use tracing::instrument;

use crate::client::Client;
use crate::error::Result;
use crate::types::{GameProducts, GameProviders};

/// Prepaid game credit top-ups
#[derive(Debug, Clone, Copy)]
pub struct Topups<'a> {
    client: &'a Client,
}

impl<'a> Topups<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip(self))]
    pub async fn game_providers(&self) -> Result<GameProviders> {
        let request = self
            .client
            .request(Method::GET, "/api/v1/topups/games/providers")
            .await?;
        self.client.send(request).await
    }

    /// Values on sale for one provider
    ///
    /// # Errors
    ///
    /// Authentication or transport failures.
    #[instrument(skip(self))]
    pub async fn game_provider_values(&self, provider_id: i64) -> Result<GameProducts> {
        let path = format!("/api/v1/topups/games/values/{provider_id}");
        let request = self.client.request(Method::GET, &path).await?;
        self.client.send(request).await
    }
}
