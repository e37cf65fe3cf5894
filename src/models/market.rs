use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Snapshot of one reserve for an asset, as aggregated by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(rename = "reserveObject")]
    pub reserve_object: String,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    #[serde(rename = "supplyAPY", default)]
    pub supply_apy: f64,
    #[serde(rename = "borrowAPY", default)]
    pub borrow_apy: f64,
    #[serde(rename = "totalATokenSupply", default)]
    pub total_a_token_supply: f64,
    #[serde(rename = "totalVariableDebt", default)]
    pub total_variable_debt: f64,
    #[serde(rename = "accruedToTreasury", default)]
    pub accrued_to_treasury: f64,
    #[serde(rename = "liquidityIndex", default)]
    pub liquidity_index: String,
    #[serde(rename = "variableBorrowIndex", default)]
    pub variable_borrow_index: String,
    #[serde(rename = "lastUpdateTimestamp", default)]
    pub last_update_timestamp: String,
}

/// Body of `GET /get-markets-by-asset/{address}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub asset: String,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    #[serde(default)]
    pub markets: Vec<MarketData>,
}

impl Market {
    /// Placeholder used while an asset's markets are pending or failed
    pub fn empty_for(asset: &Asset) -> Self {
        Self {
            asset: asset.symbol.clone(),
            token_address: asset.token_address.clone(),
            markets: Vec::new(),
        }
    }

    /// Find a market by its reserve object
    pub fn find_reserve(&self, reserve_object: &str) -> Option<&MarketData> {
        self.markets
            .iter()
            .find(|m| m.reserve_object == reserve_object)
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Body of `GET /get-market-details-by-asset/{address}/{market}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDetails {
    pub asset_address: String,
    pub market: String,
    pub protocol: String,
    #[serde(default)]
    pub apy: f64,
    #[serde(default)]
    pub tvl: f64,
    #[serde(default)]
    pub total_supply: f64,
    #[serde(default)]
    pub total_borrow: f64,
    #[serde(default)]
    pub utilization_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_market_shape() {
        let json = r#"{
            "asset": "USDC",
            "tokenAddress": "0xa",
            "markets": [{
                "accruedToTreasury": 0,
                "borrowAPY": 4.2,
                "lastUpdateTimestamp": "1718000000",
                "liquidityIndex": "1000000000000000000000000000",
                "reserveObject": "0xr",
                "supplyAPY": 3.1,
                "tokenAddress": "0xa",
                "totalATokenSupply": 1200.5,
                "totalVariableDebt": 300,
                "variableBorrowIndex": "1000000000000000000000000000"
            }]
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.markets.len(), 1);
        let data = market.find_reserve("0xr").unwrap();
        assert_eq!(data.supply_apy, 3.1);
        assert_eq!(data.borrow_apy, 4.2);
        assert!(market.find_reserve("0xmissing").is_none());
    }

    #[test]
    fn empty_market_keeps_asset_identity() {
        let asset = Asset::new("0xa", "USD Coin", "USDC", 6);
        let market = Market::empty_for(&asset);
        assert_eq!(market.asset, "USDC");
        assert_eq!(market.token_address, "0xa");
        assert!(market.is_empty());
    }
}
