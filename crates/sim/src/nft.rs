//! NFT metadata (image, marketplace link) lookups.

use crate::model::{NftEnvelope, NftMetadata};
use reqwest::Url;
use simchat_core::error::SimError;
use std::time::Duration;
use tracing::debug;

pub struct NftMetadataClient {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl NftMetadataClient {
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

    fn endpoint(&self, chain: &str, contract: &str, token_id: &str) -> Result<Url, SimError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SimError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["chain", chain, "contract", contract, "nfts", token_id]);
        Ok(url)
    }

    /// Metadata for a single token. `Ok(None)` when the response has no
    /// `nft` object.
    pub async fn nft(
        &self,
        chain: &str,
        contract: &str,
        token_id: &str,
    ) -> Result<Option<NftMetadata>, SimError> {
        let url = self.endpoint(chain, contract, token_id)?;
        debug!(path = %url.path(), "Fetching NFT metadata");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| SimError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SimError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
                body,
            });
        }

        let envelope: NftEnvelope = response
            .json()
            .await
            .map_err(|e| SimError::Decode(e.to_string()))?;
        Ok(envelope.nft)
    }
}
