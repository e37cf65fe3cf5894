//! Clients for the backend, the chain and wallets

pub mod api_client;
pub mod aptos_client;
pub mod wallet_bridge;

// Re-export for convenience
pub use api_client::RestApiClient;
pub use aptos_client::AptosClient;
pub use wallet_bridge::HttpWalletBridge;
