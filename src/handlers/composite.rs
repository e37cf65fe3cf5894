use std::sync::Arc;
use async_trait::async_trait;

use crate::models::TransactionResult;
use crate::traits::event_handler::{TransactionEvent, TransactionEventHandler};

/// Composite event handler that can combine multiple handlers
pub struct CompositeEventHandler {
    handlers: Vec<Arc<dyn TransactionEventHandler>>,
}

impl CompositeEventHandler {
    /// Create a new composite event handler
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Add a handler to the composite
    pub fn add_handler(&mut self, handler: Arc<dyn TransactionEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionEventHandler for CompositeEventHandler {
    async fn on_submitted(&self, event: &TransactionEvent) {
        for handler in &self.handlers {
            handler.on_submitted(event).await;
        }
    }

    async fn on_settled(&self, event: &TransactionEvent, result: &TransactionResult) {
        for handler in &self.handlers {
            handler.on_settled(event, result).await;
        }
    }
}
