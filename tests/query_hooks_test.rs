use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lending_dashboard::models::Asset;
use lending_dashboard::providers::{AptosClient, RestApiClient};
use lending_dashboard::query::Hooks;

fn hooks(server: &MockServer) -> Hooks {
    Hooks::with_retry_delay(
        Arc::new(RestApiClient::new(server.uri())),
        Arc::new(AptosClient::new(format!("{}/v1", server.uri()))),
        Some(Duration::from_millis(5)),
    )
}

#[tokio::test]
async fn asset_list_is_retried_twice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-assets"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let result = hooks(&server).assets().await;

    assert!(result.data.is_none());
    assert_eq!(result.error.unwrap().status(), Some(502));
    assert!(!result.is_loading);
}

#[tokio::test]
async fn fresh_assets_are_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-assets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assets": [{"tokenAddress": "0xusdc", "name": "USD Coin", "symbol": "USDC", "decimals": 6}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hooks = hooks(&server);
    let first = hooks.assets().await;
    let second = hooks.assets().await;

    assert!(first.is_success());
    assert_eq!(second.data.unwrap().len(), 1);
}

#[tokio::test]
async fn failing_asset_does_not_hide_other_markets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-markets-by-asset/0xusdc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": "USDC",
            "tokenAddress": "0xusdc",
            "markets": [{"reserveObject": "0xr1", "tokenAddress": "0xusdc", "supplyAPY": 2.5, "borrowAPY": 4.0}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    // One retry for markets: two requests in total.
    Mock::given(method("GET"))
        .and(path("/get-markets-by-asset/0xapt"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .expect(2)
        .mount(&server)
        .await;

    let assets = vec![
        Asset::new("0xusdc", "USD Coin", "USDC", 6),
        Asset::new("0xapt", "Aptos", "APT", 8),
    ];
    let view = hooks(&server).assets_with_markets(&assets).await;

    assert!(!view.is_loading);
    assert_eq!(view.errors.len(), 1);
    assert_eq!(view.errors[0].0, "0xapt");
    assert_eq!(view.get("0xusdc").unwrap().markets.markets.len(), 1);

    let apt = view.get("0xapt").unwrap();
    assert!(apt.markets.is_empty());
    assert_eq!(apt.markets.asset, "APT");
}

#[tokio::test]
async fn disabled_queries_issue_no_requests() {
    let server = MockServer::start().await;
    let hooks = hooks(&server);

    assert!(hooks.user_portfolio(None).await.data.is_none());
    assert!(hooks.user_portfolio(Some("")).await.error.is_none());
    assert!(hooks.markets_by_asset(None).await.data.is_none());
    assert!(hooks.token_balance(Some("0xuser"), None, 6).await.data.is_none());

    assert!(server.received_requests().await.unwrap().is_empty());
}
