//! Clients for the upstream wallet-data APIs.
//!
//! - [`SimClient`] talks to the Sim blockchain-data API (`X-Sim-Api-Key`).
//! - [`NftMetadataClient`] fetches NFT images and links from an
//!   OpenSea-style metadata API (`x-api-key`).
//!
//! Both return raw JSON for callers that relay it verbatim (the chat tools)
//! and typed [`model`] DTOs for callers that render it (the dashboard).

pub mod client;
pub mod model;
pub mod nft;

pub use client::SimClient;
pub use nft::NftMetadataClient;
