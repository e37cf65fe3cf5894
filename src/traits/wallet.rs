use async_trait::async_trait;

use crate::models::{EntryFunctionPayload, SubmitResponse};

/// Whether a wallet can be used right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WalletReadyState {
    Installed,
    NotDetected,
}

/// Account exposed by a connected wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: String,
}

/// Signs an entry-function payload and submits it to the chain
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> anyhow::Result<SubmitResponse>;
}

/// A wallet the user can connect through
#[async_trait]
pub trait WalletAdapter: TransactionSigner {
    fn name(&self) -> &str;

    /// Install page for users who do not have the wallet
    fn url(&self) -> Option<&str>;

    fn ready_state(&self) -> WalletReadyState;

    /// Ask the wallet for its account
    async fn connect(&self) -> anyhow::Result<WalletAccount>;

    async fn disconnect(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
