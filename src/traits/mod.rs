//! Core traits for the lending dashboard

pub mod chain_client;
pub mod data_provider;
pub mod event_handler;
pub mod wallet;

// Re-export for convenience
pub use chain_client::{BalanceProvider, ConfirmedTransaction, TransactionWaiter};
pub use data_provider::LendingDataProvider;
pub use event_handler::{TransactionEvent, TransactionEventHandler, TransactionKind};
pub use wallet::{TransactionSigner, WalletAccount, WalletAdapter, WalletReadyState};
