//! Lending Dashboard Library
//!
//! A client for an Aptos lending protocol: lists assets and their markets,
//! shows a wallet's portfolio across protocols, and submits supply and
//! withdraw transactions through a connected wallet.

// Public modules - these are the API surface
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod query;
pub mod services;
pub mod traits;
pub mod utils;
pub mod views;
pub mod wallet;

// Re-export commonly used items for easier access
pub use app::Dashboard;
pub use config::AppConfig;
pub use errors::{ApiError, TransactionError};
pub use models::{
    asset::Asset,
    market::{Market, MarketData, MarketDetails},
    portfolio::UserPortfolio,
    token::TokenBalance,
    transaction::TransactionResult,
};
pub use traits::{
    chain_client::{BalanceProvider, TransactionWaiter},
    data_provider::LendingDataProvider,
    event_handler::TransactionEventHandler,
    wallet::{TransactionSigner, WalletAdapter},
};
pub use providers::{
    api_client::RestApiClient,
    aptos_client::AptosClient,
    wallet_bridge::HttpWalletBridge,
};
pub use handlers::{
    console::ConsoleEventHandler,
    composite::CompositeEventHandler,
};
pub use query::hooks::Hooks;
pub use services::{execute_supply, execute_withdraw};
pub use wallet::WalletContext;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;
