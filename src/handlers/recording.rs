use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::TransactionResult;
use crate::traits::event_handler::{TransactionEvent, TransactionEventHandler};

/// Keeps every event in memory; used by tests and embedding callers
#[derive(Default)]
pub struct RecordingEventHandler {
    submitted: Mutex<Vec<TransactionEvent>>,
    settled: Mutex<Vec<(TransactionEvent, TransactionResult)>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<TransactionEvent> {
        self.submitted
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn settled(&self) -> Vec<(TransactionEvent, TransactionResult)> {
        self.settled
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TransactionEventHandler for RecordingEventHandler {
    async fn on_submitted(&self, event: &TransactionEvent) {
        if let Ok(mut events) = self.submitted.lock() {
            events.push(event.clone());
        }
    }

    async fn on_settled(&self, event: &TransactionEvent, result: &TransactionResult) {
        if let Ok(mut events) = self.settled.lock() {
            events.push((event.clone(), result.clone()));
        }
    }
}
