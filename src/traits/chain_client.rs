use async_trait::async_trait;

use crate::errors::{ApiError, TransactionError};
use crate::models::TokenBalance;

/// A transaction the chain reports as committed and successful
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedTransaction {
    pub hash: String,
    pub version: Option<String>,
    pub vm_status: String,
}

/// Blocks until a submitted transaction is confirmed
#[async_trait]
pub trait TransactionWaiter: Send + Sync {
    async fn wait_for_transaction(&self, hash: &str) -> Result<ConfirmedTransaction, TransactionError>;
}

/// Reads wallet balances from the chain
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Balance of `asset_type` held by `owner`, zero if the account never held it
    async fn fetch_balance(
        &self,
        owner: &str,
        asset_type: &str,
        decimals: u8,
    ) -> Result<TokenBalance, ApiError>;
}
