//! Data models for the lending dashboard

pub mod asset;
pub mod market;
pub mod portfolio;
pub mod token;
pub mod transaction;

// Re-export for convenience
pub use asset::{Asset, AssetsResponse};
pub use market::{Market, MarketData, MarketDetails};
pub use portfolio::{ProtocolPortfolio, UserAssetData, UserPortfolio, FALLBACK_POSITION_DECIMALS};
pub use token::TokenBalance;
pub use transaction::{EntryFunctionPayload, SubmitResponse, TransactionResult};
