use serde::{Deserialize, Serialize};

/// A lendable token as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub token_address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Asset {
    /// Create a new asset
    pub fn new(
        token_address: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            token_address: token_address.into(),
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Body of `GET /get-assets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsResponse {
    pub assets: Vec<Asset>,
}
