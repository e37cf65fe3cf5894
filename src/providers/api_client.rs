use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::ApiError;
use crate::models::{Asset, AssetsResponse, Market, MarketDetails, UserPortfolio};
use crate::traits::data_provider::LendingDataProvider;

/// REST client for the lending backend
#[derive(Clone)]
pub struct RestApiClient {
    client: Client,
    base_url: String,
}

impl RestApiClient {
    /// Create a new API client against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET and parse the body, classifying every failure
    async fn fetch_api<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            warn!("API request {} failed with status {}", endpoint, status);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

fn require<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} is required", what)));
    }
    Ok(value)
}

#[async_trait]
impl LendingDataProvider for RestApiClient {
    async fn get_assets(&self) -> Result<Vec<Asset>, ApiError> {
        let response: AssetsResponse = self.fetch_api("/get-assets").await?;
        debug!("Fetched {} assets", response.assets.len());
        Ok(response.assets)
    }

    async fn get_markets_by_asset(&self, asset_address: &str) -> Result<Market, ApiError> {
        let asset_address = require(asset_address, "Asset address")?;
        self.fetch_api(&format!("/get-markets-by-asset/{}", encode(asset_address)))
            .await
    }

    async fn get_market_details_by_asset(
        &self,
        asset_address: &str,
        market: &str,
    ) -> Result<MarketDetails, ApiError> {
        let asset_address = require(asset_address, "Asset address")?;
        let market = require(market, "Market name")?;
        self.fetch_api(&format!(
            "/get-market-details-by-asset/{}/{}",
            encode(asset_address),
            encode(market)
        ))
        .await
    }

    async fn get_user_portfolio(&self, user_address: &str) -> Result<UserPortfolio, ApiError> {
        let user_address = require(user_address, "User address")?;
        let portfolio: UserPortfolio = self
            .fetch_api(&format!("/get-user-portfolio/{}", encode(user_address)))
            .await?;

        for (protocol, error) in &portfolio.errors {
            warn!("Portfolio fetch for {} failed: {}", protocol, error);
        }
        Ok(portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_identifiers_fail_without_a_request() {
        // Unroutable base: any request issued would surface as a network error.
        let client = RestApiClient::new("http://127.0.0.1:9");

        let err = client.get_markets_by_asset("").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Asset address is required"));

        let err = client.get_market_details_by_asset("0xa", " ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Market name is required"));

        let err = client.get_user_portfolio("").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "User address is required"));
    }

    #[test]
    fn strips_trailing_slash_from_base() {
        let client = RestApiClient::new("http://backend.test/api/");
        assert_eq!(client.base_url(), "http://backend.test/api");
    }
}
