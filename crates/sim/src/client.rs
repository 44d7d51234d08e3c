//! Sim blockchain-data API client.

use crate::model::{ActivityResponse, BalancesResponse, CollectiblesResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;
use simchat_core::error::SimError;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Header carrying the Sim API key.
pub const API_KEY_HEADER: &str = "X-Sim-Api-Key";

/// Thin client over the Sim HTTP API. One call, one request; no retries.
pub struct SimClient {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl SimClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SimError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SimError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SimError::InvalidEndpoint(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SimError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Build an endpoint URL from path segments. Each segment is
    /// percent-encoded, so caller-supplied values cannot alter the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SimError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SimError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint and return its JSON body untouched.
    pub async fn get_json(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, SimError> {
        self.get(segments, query).await
    }

    /// GET an endpoint and decode its JSON body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, SimError> {
        let url = self.endpoint(segments)?;
        let started = Instant::now();
        debug!(path = %url.path(), "Calling Sim API");

        let response = self
            .client
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| SimError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(path = %url.path(), status = status.as_u16(), body = %body, "Sim API request failed");
            return Err(SimError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
                body,
            });
        }

        let decoded = response
            .json::<T>()
            .await
            .map_err(|e| SimError::Decode(e.to_string()))?;
        debug!(
            path = %url.path(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sim API call complete"
        );
        Ok(decoded)
    }

    /// Token balances for an EVM wallet, with URL and logo metadata and
    /// spam tokens excluded.
    pub async fn evm_balances(
        &self,
        address: &str,
        chain_ids: &str,
    ) -> Result<BalancesResponse, SimError> {
        self.get(
            &["v1", "evm", "balances", address],
            &[
                ("chain_ids", chain_ids.to_string()),
                ("metadata", "url,logo".to_string()),
                ("exclude_spam_tokens", "true".to_string()),
                ("limit", "1000".to_string()),
            ],
        )
        .await
    }

    /// One page of wallet activity, newest first.
    pub async fn evm_activity(
        &self,
        address: &str,
        limit: u32,
        offset: Option<&str>,
    ) -> Result<ActivityResponse, SimError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(offset) = offset.filter(|o| !o.is_empty()) {
            query.push(("offset", offset.to_string()));
        }
        self.get(&["v1", "evm", "activity", address], &query).await
    }

    /// NFTs held by a wallet.
    pub async fn evm_collectibles(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<CollectiblesResponse, SimError> {
        self.get(
            &["v1", "evm", "collectibles", address],
            &[("limit", limit.to_string())],
        )
        .await
    }
}
