//! Wallet connection state

pub mod context;

pub use context::{GroupedWallets, WalletContext};
