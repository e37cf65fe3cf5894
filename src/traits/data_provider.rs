use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{Asset, Market, MarketDetails, UserPortfolio};

/// Core trait for fetching lending data from the backend
#[async_trait]
pub trait LendingDataProvider: Send + Sync {
    /// Fetch every listed asset
    async fn get_assets(&self) -> Result<Vec<Asset>, ApiError>;

    /// Fetch the markets of one asset
    async fn get_markets_by_asset(&self, asset_address: &str) -> Result<Market, ApiError>;

    /// Fetch details for an asset within one market (e.g. "aave")
    async fn get_market_details_by_asset(
        &self,
        asset_address: &str,
        market: &str,
    ) -> Result<MarketDetails, ApiError>;

    /// Fetch a user's portfolio across protocols
    async fn get_user_portfolio(&self, user_address: &str) -> Result<UserPortfolio, ApiError>;
}
