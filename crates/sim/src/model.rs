//! Typed views of the upstream JSON.
//!
//! Every field the upstream may omit is an `Option`; collections default to
//! empty. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// `GET /v1/evm/balances/{address}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalancesResponse {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub next_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Token contract address, or `"native"`
    #[serde(default)]
    pub address: Option<String>,
    /// Raw integer amount in the token's smallest unit, as a decimal string
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub value_usd: Option<f64>,
    #[serde(default)]
    pub token_metadata: Option<TokenMetadata>,
    #[serde(default)]
    pub low_liquidity: Option<bool>,
}

/// Optional metadata attached to balances and activity entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /v1/evm/activity/{address}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityResponse {
    #[serde(default)]
    pub activity: Vec<Activity>,
    /// Cursor for the next page; absent on the last page
    #[serde(default)]
    pub next_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub block_number: Option<u64>,
    /// RFC 3339 timestamp of the including block
    #[serde(default)]
    pub block_time: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    /// `receive`, `send`, `mint`, `burn`, `swap`, `approve`, `call`, ...
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// `native`, `erc20`, `erc721`, ...
    #[serde(default)]
    pub asset_type: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    /// Raw integer amount, as a decimal string
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_usd: Option<f64>,
    #[serde(default)]
    pub token_metadata: Option<TokenMetadata>,
}

/// `GET /v1/evm/collectibles/{address}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectiblesResponse {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub entries: Vec<Collectible>,
    #[serde(default)]
    pub next_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collectible {
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub token_standard: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub last_acquired: Option<String>,
}

/// The `nft` object of the metadata API's single-NFT endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub opensea_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NftEnvelope {
    #[serde(default)]
    pub nft: Option<NftMetadata>,
}
