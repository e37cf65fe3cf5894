use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::from_base_units;

/// Decimals assumed for a position whose asset is not in the asset list
pub const FALLBACK_POSITION_DECIMALS: u8 = 6;

/// A user's position in one protocol for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAssetData {
    pub asset: String,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    #[serde(default)]
    pub current_a_token_balance: String,
    #[serde(default)]
    pub current_variable_debt: String,
    #[serde(default)]
    pub scaled_variable_debt: String,
    #[serde(default)]
    pub principal_stable_debt: String,
    #[serde(default)]
    pub scaled_a_token_balance: String,
    #[serde(default)]
    pub stable_borrow_rate: String,
    #[serde(default)]
    pub stable_rate_last_updated: String,
    #[serde(default)]
    pub usage_as_collateral_enabled: String,
}

impl UserAssetData {
    /// Supplied balance in asset units, zero if unparseable
    pub fn supplied(&self, decimals: u8) -> Decimal {
        from_base_units(&self.current_a_token_balance, decimals).unwrap_or(Decimal::ZERO)
    }

    /// Variable debt in asset units, zero if unparseable
    pub fn borrowed(&self, decimals: u8) -> Decimal {
        from_base_units(&self.current_variable_debt, decimals).unwrap_or(Decimal::ZERO)
    }

    pub fn uses_as_collateral(&self) -> bool {
        matches!(
            self.usage_as_collateral_enabled.trim(),
            "true" | "1" | "True" | "TRUE"
        )
    }
}

/// Aggregate risk metrics of a user within one protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPortfolio {
    pub protocol: String,
    pub user_address: String,
    #[serde(default)]
    pub total_collateral_base: String,
    #[serde(default)]
    pub total_debt_base: String,
    #[serde(default)]
    pub available_borrows_base: String,
    #[serde(default)]
    pub current_liquidation_threshold: String,
    #[serde(default)]
    pub ltv: String,
    #[serde(default)]
    pub health_factor: String,
    #[serde(default)]
    pub user_asset_data: Vec<UserAssetData>,
}

impl ProtocolPortfolio {
    /// Find the position for a token address
    pub fn position(&self, token_address: &str) -> Option<&UserAssetData> {
        self.user_asset_data
            .iter()
            .find(|p| p.token_address == token_address)
    }
}

/// Portfolio of a user across protocols, with per-protocol fetch errors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPortfolio {
    pub user_address: String,
    #[serde(default)]
    pub protocols: BTreeMap<String, ProtocolPortfolio>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl UserPortfolio {
    /// Error reported for a protocol in this fetch, if any
    pub fn protocol_error(&self, protocol: &str) -> Option<&str> {
        self.errors.get(protocol).map(String::as_str)
    }

    /// Protocols whose section may be rendered: fetched and not errored
    pub fn renderable_protocols(&self) -> impl Iterator<Item = (&String, &ProtocolPortfolio)> {
        self.protocols
            .iter()
            .filter(|(name, _)| !self.errors.contains_key(*name))
    }

    /// Find a user's position in a protocol for an asset
    pub fn position(&self, protocol: &str, token_address: &str) -> Option<&UserAssetData> {
        self.protocols
            .get(protocol)
            .and_then(|p| p.position(token_address))
    }

    /// Check if the portfolio holds no protocol data and no errors
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty() && self.errors.is_empty()
    }
}
