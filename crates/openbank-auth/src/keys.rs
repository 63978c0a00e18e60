//! Provider signing keys fetched from the discovery endpoint
//!
//! The cache only grows: a refresh merges the fetched keys over the existing
//! ones (last write wins per `kid`) and never evicts, so a webhook signed with
//! a key the provider has since rotated out still verifies. Lookups never
//! touch the network; [`KeyCache::resolve`] refreshes at most once per miss.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use openbank_http::HttpTransport;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::KeyCacheError;
use crate::identity::DISCOVERY_PATH;
use crate::jose::Jwk;

/// Discovery responses are decoded entry by entry so one bad key cannot
/// hide the rest of the set
#[derive(Debug, Deserialize)]
struct DiscoveryResponse {
    #[serde(default)]
    keys: Vec<Value>,
}

/// Provider public keys indexed by key id
#[derive(Debug)]
pub struct KeyCache {
    transport: HttpTransport,
    base_url: Url,
    keys: RwLock<HashMap<String, Arc<Jwk>>>,
}

impl KeyCache {
    /// Cache backed by `{base_url}/api/v1/discovery/keys`
    pub fn new(transport: HttpTransport, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a key without any I/O
    pub fn get(&self, kid: &str) -> Option<Arc<Jwk>> {
        self.keys.read().get(kid).cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Sorted ids of every cached key
    pub fn key_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.keys.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Seed or override a key, returning the one it replaced
    ///
    /// Keys without a `kid` cannot be addressed and are ignored.
    pub fn insert(&self, jwk: Jwk) -> Option<Arc<Jwk>> {
        let kid = jwk.kid()?.to_string();
        self.keys.write().insert(kid, Arc::new(jwk))
    }

    /// Fetch the discovery endpoint and merge its keys into the cache
    ///
    /// Returns how many keys the response contributed. Entries without a
    /// `kid` or that are not valid JWKs are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`KeyCacheError::Refresh`] if the endpoint is unreachable, answers
    /// non-2xx, or returns something other than a key set. The cache is left
    /// untouched in that case.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn refresh(&self) -> Result<usize, KeyCacheError> {
        let response = self
            .transport
            .request(Method::GET, &self.base_url, DISCOVERY_PATH)
            .execute::<DiscoveryResponse>()
            .await?;

        let mut fetched = Vec::with_capacity(response.data.keys.len());
        for entry in response.data.keys {
            let jwk = match serde_json::from_value::<Jwk>(entry) {
                Ok(jwk) => jwk,
                Err(e) => {
                    warn!(error = %e, "skipping malformed discovery key");
                    continue;
                }
            };
            let Some(kid) = jwk.kid().filter(|kid| !kid.is_empty()).map(str::to_string) else {
                warn!("skipping discovery key without kid");
                continue;
            };
            fetched.push((kid, Arc::new(jwk)));
        }

        let added = fetched.len();
        let total = {
            let mut keys = self.keys.write();
            keys.extend(fetched);
            keys.len()
        };
        info!(added, total, "provider keys refreshed");
        Ok(added)
    }

    /// Look up `kid`, refreshing once if it is not cached
    ///
    /// # Errors
    ///
    /// [`KeyCacheError::Refresh`] if the refresh fails,
    /// [`KeyCacheError::KeyNotFound`] if the key is still absent afterwards.
    pub async fn resolve(&self, kid: &str) -> Result<Arc<Jwk>, KeyCacheError> {
        if let Some(jwk) = self.get(kid) {
            return Ok(jwk);
        }

        debug!(kid, "provider key not cached, refreshing");
        self.refresh().await?;
        self.get(kid).ok_or_else(|| KeyCacheError::KeyNotFound {
            kid: kid.to_string(),
        })
    }
}
