//! Wallet dashboard: balances, paginated activity and NFT collectibles,
//! rendered server-side.

use crate::format::{capitalize, format_timestamp, format_token_amount, format_usd, short_address};
use crate::frontend::{self, DASHBOARD_TEMPLATE};
use crate::health_handler;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use futures::future::join_all;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use simchat_config::DashboardConfig;
use simchat_sim::model::{Activity, Balance, Collectible};
use simchat_sim::{NftMetadataClient, SimClient};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const TEMPLATE_NAME: &str = "dashboard.html";

/// Everything the dashboard handlers share.
pub struct DashboardState {
    sim: Arc<SimClient>,
    /// `None` when no NFT metadata key is configured; collectibles then
    /// render without images.
    nft: Option<Arc<NftMetadataClient>>,
    settings: DashboardConfig,
    templates: Environment<'static>,
}

impl DashboardState {
    pub fn new(
        sim: Arc<SimClient>,
        nft: Option<Arc<NftMetadataClient>>,
        settings: DashboardConfig,
    ) -> Result<Self, minijinja::Error> {
        let mut templates = Environment::new();
        templates.add_template(TEMPLATE_NAME, DASHBOARD_TEMPLATE)?;
        Ok(Self {
            sim,
            nft,
            settings,
            templates,
        })
    }

    fn render(&self, page: &DashboardPage) -> Result<String, minijinja::Error> {
        self.templates.get_template(TEMPLATE_NAME)?.render(page)
    }
}

pub fn dashboard_router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::dashboard_assets_router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(rename = "walletAddress", default)]
    pub wallet_address: Option<String>,
    #[serde(rename = "chainIds", default)]
    pub chain_ids: Option<String>,
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub activity_offset: Option<String>,
}

// --- View models ---

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub symbol: String,
    pub name: String,
    pub chain: String,
    pub amount: String,
    pub price: String,
    pub value: String,
    pub logo: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub kind: String,
    pub direction: String,
    pub asset: String,
    pub chain: String,
    pub party_label: &'static str,
    pub party: String,
    pub timestamp: String,
    pub amount_prefix: &'static str,
    pub amount: String,
    pub value: String,
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectibleView {
    pub name: String,
    pub collection: String,
    pub chain: String,
    pub contract: String,
    pub token_id: String,
    pub image_url: Option<String>,
    pub opensea_url: Option<String>,
    pub description: Option<String>,
}

/// Per-section failure messages. A failed section renders empty with its
/// message; the others are unaffected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionErrors {
    pub tokens: Option<String>,
    pub activity: Option<String>,
    pub collectibles: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub wallet_address: String,
    pub chain_ids: String,
    pub current_tab: String,
    pub total_value: String,
    pub tokens: Vec<TokenView>,
    pub activities: Vec<ActivityView>,
    pub collectibles: Vec<CollectibleView>,
    pub next_activity_offset: Option<String>,
    pub errors: SectionErrors,
}

async fn dashboard_handler(
    State(state): State<Arc<DashboardState>>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let page = load_page(&state, query).await;
    match state.render(&page) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!(error = %e, "Dashboard template failed to render");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while rendering the dashboard",
            )
                .into_response()
        }
    }
}

/// Fetch and reshape everything the page shows. With no wallet address the
/// page is empty and nothing is fetched.
pub async fn load_page(state: &DashboardState, query: DashboardQuery) -> DashboardPage {
    let wallet_address = query
        .wallet_address
        .map(|a| a.trim().to_string())
        .unwrap_or_default();
    let chain_ids = query
        .chain_ids
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.settings.default_chain_ids.clone());
    let current_tab = query
        .tab
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "tokens".to_string());

    let mut page = DashboardPage {
        wallet_address,
        chain_ids,
        current_tab,
        total_value: format_usd(0.0),
        tokens: Vec::new(),
        activities: Vec::new(),
        collectibles: Vec::new(),
        next_activity_offset: None,
        errors: SectionErrors::default(),
    };
    if page.wallet_address.is_empty() {
        return page;
    }

    let address = page.wallet_address.as_str();
    info!(wallet = %short_address(address), chain_ids = %page.chain_ids, "Loading wallet dashboard");

    let (balances, activity, collectibles) = tokio::join!(
        state.sim.evm_balances(address, &page.chain_ids),
        state.sim.evm_activity(
            address,
            state.settings.activity_limit,
            query.activity_offset.as_deref()
        ),
        state
            .sim
            .evm_collectibles(address, state.settings.collectibles_limit),
    );

    match balances {
        Ok(resp) => {
            let total: f64 = resp
                .balances
                .iter()
                .filter_map(|b| b.value_usd)
                .filter(|v| v.is_finite())
                .sum();
            page.total_value = format_usd(total);
            page.tokens = resp.balances.iter().map(token_view).collect();
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch wallet balances");
            page.errors.tokens = Some(format!("Could not load token balances: {e}"));
        }
    }

    match activity {
        Ok(resp) => {
            page.activities = resp.activity.iter().map(activity_view).collect();
            page.next_activity_offset = resp.next_offset.filter(|o| !o.is_empty());
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch wallet activity");
            page.errors.activity = Some(format!("Could not load activity: {e}"));
        }
    }

    match collectibles {
        Ok(resp) => {
            page.collectibles = enrich_collectibles(state.nft.as_deref(), resp.entries).await;
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch wallet collectibles");
            page.errors.collectibles = Some(format!("Could not load collectibles: {e}"));
        }
    }

    page
}

fn token_view(balance: &Balance) -> TokenView {
    let meta = balance.token_metadata.as_ref();
    let decimals = balance.decimals.or_else(|| meta.and_then(|m| m.decimals));

    TokenView {
        symbol: balance
            .symbol
            .clone()
            .or_else(|| meta.and_then(|m| m.symbol.clone()))
            .unwrap_or_else(|| "N/A".to_string()),
        name: balance
            .name
            .clone()
            .or_else(|| meta.and_then(|m| m.name.clone()))
            .unwrap_or_else(|| "Unknown Token".to_string()),
        chain: balance
            .chain
            .clone()
            .unwrap_or_else(|| "Unknown Chain".to_string()),
        amount: human_amount(balance.amount.as_deref(), decimals),
        price: balance
            .price_usd
            .map(format_usd)
            .unwrap_or_else(|| "N/A".to_string()),
        value: format_usd(balance.value_usd.unwrap_or(0.0)),
        logo: meta.and_then(|m| m.logo.clone()),
        url: meta.and_then(|m| m.url.clone()),
    }
}

fn activity_view(item: &Activity) -> ActivityView {
    let kind = item.kind.clone().unwrap_or_else(|| "unknown".to_string());
    let meta = item.token_metadata.as_ref();

    let asset = meta
        .and_then(|m| m.symbol.clone())
        .or_else(|| item.asset_type.as_ref().map(|t| t.to_uppercase()))
        .unwrap_or_else(|| "N/A".to_string());

    let (party_label, party) = match kind.as_str() {
        "receive" => ("From", item.from.as_deref()),
        "send" => ("To", item.to.as_deref()),
        _ if item.to.is_some() => ("To", item.to.as_deref()),
        _ => ("Contract", item.token_address.as_deref()),
    };

    let amount_prefix = match kind.as_str() {
        "receive" => "+",
        "send" => "-",
        _ => "",
    };

    // Native transfers carry no token metadata; EVM natives use 18 decimals.
    let decimals = meta.and_then(|m| m.decimals).or_else(|| {
        (item.asset_type.as_deref() == Some("native")).then_some(18)
    });

    ActivityView {
        direction: item
            .kind
            .as_deref()
            .map(capitalize)
            .unwrap_or_else(|| "Unknown".to_string()),
        kind,
        asset,
        chain: item
            .chain
            .clone()
            .unwrap_or_else(|| "Unknown Chain".to_string()),
        party_label,
        party: party.map(short_address).unwrap_or_else(|| "N/A".to_string()),
        timestamp: item
            .block_time
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "N/A".to_string()),
        amount_prefix,
        amount: human_amount(item.value.as_deref(), decimals),
        value: item
            .value_usd
            .map(format_usd)
            .unwrap_or_else(|| "N/A".to_string()),
        tx_hash: item.tx_hash.clone(),
    }
}

fn human_amount(raw: Option<&str>, decimals: Option<u32>) -> String {
    match (raw, decimals) {
        (Some(raw), Some(decimals)) => {
            format_token_amount(raw, decimals).unwrap_or_else(|| raw.to_string())
        }
        (Some(raw), None) => raw.to_string(),
        (None, _) => "0".to_string(),
    }
}

/// Attach image and marketplace data to each collectible, all lookups in
/// flight at once. A failed lookup leaves the item without an image.
async fn enrich_collectibles(
    nft: Option<&NftMetadataClient>,
    entries: Vec<Collectible>,
) -> Vec<CollectibleView> {
    let lookups = entries.into_iter().map(move |entry| async move {
        let metadata = match (
            nft,
            entry.chain.as_deref(),
            entry.contract_address.as_deref(),
            entry.token_id.as_deref(),
        ) {
            (Some(client), Some(chain), Some(contract), Some(token_id)) => {
                match client.nft(chain, contract, token_id).await {
                    Ok(found) => found,
                    Err(e) => {
                        debug!(
                            chain,
                            contract,
                            token_id,
                            error = %e,
                            "NFT metadata lookup failed"
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        collectible_view(entry, metadata)
    });

    join_all(lookups).await
}

fn collectible_view(
    entry: Collectible,
    metadata: Option<simchat_sim::model::NftMetadata>,
) -> CollectibleView {
    let metadata = metadata.unwrap_or_default();
    let token_id = entry.token_id.unwrap_or_else(|| "N/A".to_string());

    CollectibleView {
        name: metadata
            .name
            .or_else(|| entry.name.clone())
            .unwrap_or_else(|| format!("#{token_id}")),
        collection: metadata
            .collection
            .or(entry.name)
            .unwrap_or_else(|| "Unknown Collection".to_string()),
        chain: entry.chain.unwrap_or_else(|| "Unknown Chain".to_string()),
        contract: entry
            .contract_address
            .as_deref()
            .map(short_address)
            .unwrap_or_else(|| "N/A".to_string()),
        token_id,
        image_url: metadata.image_url.filter(|u| !u.is_empty()),
        opensea_url: metadata.opensea_url,
        description: metadata.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::body::Body;
    use axum::extract::Path;
    use axum::http::Request;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A Sim stand-in with two priced tokens, one send and one collectible.
    async fn mock_sim(hits: Arc<AtomicUsize>, fail_activity: bool) -> String {
        let (bal_hits, act_hits, col_hits) = (hits.clone(), hits.clone(), hits);

        let app = Router::new()
            .route(
                "/v1/evm/balances/{address}",
                get(move |Path(address): Path<String>| async move {
                    bal_hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "wallet_address": address,
                        "balances": [
                            {
                                "chain": "ethereum", "chain_id": 1, "address": "native",
                                "amount": "1500000000000000000", "symbol": "ETH",
                                "name": "Ether", "decimals": 18,
                                "price_usd": 3000.0, "value_usd": 4500.0
                            },
                            {
                                "chain": "base", "chain_id": 8453, "address": "0xusdc",
                                "amount": "1234560000", "symbol": "USDC", "decimals": 6,
                                "price_usd": 1.0, "value_usd": 1234.56
                            },
                            { "amount": "7" }
                        ]
                    }))
                }),
            )
            .route(
                "/v1/evm/activity/{address}",
                get(move || async move {
                    act_hits.fetch_add(1, Ordering::SeqCst);
                    if fail_activity {
                        return Err(StatusCode::SERVICE_UNAVAILABLE);
                    }
                    Ok(Json(serde_json::json!({
                        "activity": [{
                            "chain": "ethereum", "type": "send", "asset_type": "native",
                            "to": "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
                            "value": "250000000000000000", "value_usd": 750.0,
                            "block_time": "2025-01-02T14:05:09+00:00"
                        }],
                        "next_offset": "page-2"
                    })))
                }),
            )
            .route(
                "/v1/evm/collectibles/{address}",
                get(move || async move {
                    col_hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "entries": [{
                            "chain": "ethereum",
                            "contract_address": "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d",
                            "token_id": "42", "name": "Apes"
                        }]
                    }))
                }),
            );
        serve(app).await
    }

    fn state(sim_url: &str) -> Arc<DashboardState> {
        let sim = SimClient::new(sim_url, "test-sim-key", Duration::from_secs(5)).unwrap();
        Arc::new(DashboardState::new(Arc::new(sim), None, DashboardConfig::default()).unwrap())
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn balance_with_absurd_decimals_shows_raw_amount() {
        let balance = Balance {
            symbol: Some("BAD".into()),
            amount: Some("12345".into()),
            decimals: Some(u32::MAX),
            ..Default::default()
        };
        assert_eq!(token_view(&balance).amount, "12345");

        let sane = Balance {
            decimals: Some(2),
            ..balance
        };
        assert_eq!(token_view(&sane).amount, "123.45");
    }

    #[tokio::test]
    async fn no_wallet_renders_empty_without_fetching() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = mock_sim(hits.clone(), false).await;
        let st = state(&url);

        let page = load_page(&st, DashboardQuery::default()).await;
        assert!(page.tokens.is_empty());
        assert!(page.activities.is_empty());
        assert!(page.collectibles.is_empty());
        assert_eq!(page.total_value, "$0.00");
        assert_eq!(page.current_tab, "tokens");
        assert_eq!(page.chain_ids, "all");

        let blank = DashboardQuery {
            wallet_address: Some("   ".into()),
            ..Default::default()
        };
        let page = load_page(&st, blank).await;
        assert!(page.tokens.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn total_is_sum_of_token_values() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = mock_sim(hits.clone(), false).await;

        let page = load_page(
            &state(&url),
            DashboardQuery {
                wallet_address: Some("0xabc".into()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(page.total_value, "$5,734.56");
        assert_eq!(page.tokens.len(), 3);
        assert_eq!(page.tokens[0].amount, "1.5");
        assert_eq!(page.tokens[1].amount, "1234.56");
        assert_eq!(page.tokens[1].price, "$1.00");

        let unknown = &page.tokens[2];
        assert_eq!(unknown.symbol, "N/A");
        assert_eq!(unknown.name, "Unknown Token");
        assert_eq!(unknown.chain, "Unknown Chain");
        assert_eq!(unknown.price, "N/A");
        assert_eq!(unknown.value, "$0.00");
        assert_eq!(unknown.amount, "7");
    }

    #[tokio::test]
    async fn activity_is_reshaped_for_display() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let page = load_page(
            &state(&url),
            DashboardQuery {
                wallet_address: Some("0xabc".into()),
                ..Default::default()
            },
        )
        .await;

        let item = &page.activities[0];
        assert_eq!(item.direction, "Send");
        assert_eq!(item.asset, "NATIVE");
        assert_eq!(item.party_label, "To");
        assert_eq!(item.party, "0xd8da...6045");
        assert_eq!(item.amount_prefix, "-");
        assert_eq!(item.amount, "0.25");
        assert_eq!(item.value, "$750.00");
        assert_eq!(item.timestamp, "Jan 2, 2025 14:05 UTC");
        assert_eq!(page.next_activity_offset.as_deref(), Some("page-2"));
    }

    #[tokio::test]
    async fn collectibles_without_metadata_keep_placeholder() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let page = load_page(
            &state(&url),
            DashboardQuery {
                wallet_address: Some("0xabc".into()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(page.collectibles.len(), 1);
        let nft = &page.collectibles[0];
        assert!(nft.image_url.is_none());
        assert_eq!(nft.name, "Apes");
        assert_eq!(nft.token_id, "42");
    }

    #[tokio::test]
    async fn collectibles_are_enriched_from_metadata_api() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let metadata_app = Router::new().route(
            "/chain/{chain}/contract/{contract}/nfts/{id}",
            get(|Path((_, _, id)): Path<(String, String, String)>| async move {
                Json(serde_json::json!({
                    "nft": {
                        "identifier": id,
                        "collection": "boredapeyachtclub",
                        "name": format!("Ape #{id}"),
                        "image_url": "https://img.example/42.png",
                        "opensea_url": "https://opensea.io/assets/42"
                    }
                }))
            }),
        );
        let metadata_url = serve(metadata_app).await;

        let sim = SimClient::new(&url, "test-sim-key", Duration::from_secs(5)).unwrap();
        let nft =
            NftMetadataClient::new(&metadata_url, "test-nft-key", Duration::from_secs(5)).unwrap();
        let st = DashboardState::new(
            Arc::new(sim),
            Some(Arc::new(nft)),
            DashboardConfig::default(),
        )
        .unwrap();

        let page = load_page(
            &st,
            DashboardQuery {
                wallet_address: Some("0xabc".into()),
                ..Default::default()
            },
        )
        .await;

        let nft = &page.collectibles[0];
        assert_eq!(nft.name, "Ape #42");
        assert_eq!(nft.collection, "boredapeyachtclub");
        assert_eq!(nft.image_url.as_deref(), Some("https://img.example/42.png"));
    }

    #[tokio::test]
    async fn failed_section_reports_error_and_others_render() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), true).await;
        let (status, body) = get_body(
            dashboard_router(state(&url)),
            "/?walletAddress=0xabc&tab=activity",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not load activity"));
        assert!(body.contains("$5,734.56"));
        assert!(body.contains("Ether"));
    }

    #[tokio::test]
    async fn page_renders_without_wallet() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let (status, body) = get_body(dashboard_router(state(&url)), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("$0.00"));
        assert!(body.contains("/static/dashboard.js"));
    }

    #[tokio::test]
    async fn rendered_page_links_next_activity_page() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let (_, body) = get_body(dashboard_router(state(&url)), "/?walletAddress=0xabc").await;
        assert!(body.contains("activity_offset=page-2"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let url = mock_sim(Arc::new(AtomicUsize::new(0)), false).await;
        let (status, body) = get_body(dashboard_router(state(&url)), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));
    }
}
