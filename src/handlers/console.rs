use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::TransactionResult;
use crate::traits::event_handler::{TransactionEvent, TransactionEventHandler};

/// Console logging event handler
pub struct ConsoleEventHandler;

impl ConsoleEventHandler {
    /// Create a new console event handler
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionEventHandler for ConsoleEventHandler {
    async fn on_submitted(&self, event: &TransactionEvent) {
        info!("{}", "-".repeat(80));
        info!(
            "  {} {} {} for {}",
            event.kind.label(),
            event.amount,
            event.symbol,
            event.user_address
        );
    }

    async fn on_settled(&self, event: &TransactionEvent, result: &TransactionResult) {
        if result.success {
            info!(
                "  ✓ {} confirmed: {}",
                event.kind.label(),
                result.hash.as_deref().unwrap_or("-")
            );
        } else {
            warn!(
                "  ✗ {} failed: {}",
                event.kind.label(),
                result.error.as_deref().unwrap_or("Unknown error")
            );
        }
        info!("{}", "=".repeat(80));
    }
}
