use async_trait::async_trait;

use crate::models::TransactionResult;

/// Which transaction service produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Supply,
    Withdraw,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supply => "Supply",
            Self::Withdraw => "Withdraw",
        }
    }
}

/// Details of a submission, handed to event handlers
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEvent {
    pub kind: TransactionKind,
    pub symbol: String,
    pub amount: String,
    pub user_address: String,
}

/// Handler for transaction lifecycle events
#[async_trait]
pub trait TransactionEventHandler: Send + Sync {
    /// Called right before the wallet is asked to sign
    async fn on_submitted(&self, event: &TransactionEvent);

    /// Called once a submission settles, successful or not
    async fn on_settled(&self, event: &TransactionEvent, result: &TransactionResult);
}
