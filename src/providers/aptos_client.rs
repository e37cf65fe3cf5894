use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::errors::{ApiError, TransactionError};
use crate::models::TokenBalance;
use crate::traits::chain_client::{BalanceProvider, ConfirmedTransaction, TransactionWaiter};

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Aptos fullnode REST client (polling approach)
#[derive(Clone)]
pub struct AptosClient {
    client: Client,
    node_url: String,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl AptosClient {
    /// Create a new client against a fullnode `.../v1` base URL
    pub fn new(node_url: impl Into<String>) -> Self {
        let node_url: String = node_url.into();
        Self {
            client: Client::new(),
            node_url: node_url.trim_end_matches('/').to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// One lookup of a transaction; `None` while it is unknown or pending
    async fn poll_transaction(&self, hash: &str) -> Result<Option<Value>, TransactionError> {
        let url = format!("{}/transactions/by_hash/{}", self.node_url, hash);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransactionError::Confirmation(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransactionError::Confirmation(format!(
                "node returned {} for {}: {}",
                status, hash, text
            )));
        }

        let txn: Value = response
            .json()
            .await
            .map_err(|e| TransactionError::Confirmation(e.to_string()))?;

        if txn.get("type").and_then(Value::as_str) == Some("pending_transaction") {
            return Ok(None);
        }
        Ok(Some(txn))
    }
}

#[async_trait]
impl TransactionWaiter for AptosClient {
    async fn wait_for_transaction(&self, hash: &str) -> Result<ConfirmedTransaction, TransactionError> {
        let deadline = Instant::now() + self.wait_timeout;
        info!("Waiting for transaction {} to be confirmed", hash);

        loop {
            if let Some(txn) = self.poll_transaction(hash).await? {
                let vm_status = txn
                    .get("vm_status")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                if txn.get("success").and_then(Value::as_bool) != Some(true) {
                    warn!("Transaction {} committed but failed: {}", hash, vm_status);
                    return Err(TransactionError::Confirmation(format!(
                        "Transaction {} failed with status: {}",
                        hash, vm_status
                    )));
                }

                let version = txn.get("version").and_then(Value::as_str).map(str::to_string);
                info!("Transaction {} confirmed at version {:?}", hash, version);
                return Ok(ConfirmedTransaction {
                    hash: hash.to_string(),
                    version,
                    vm_status,
                });
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(TransactionError::Confirmation(format!(
                    "Timed out after {:?} waiting for transaction {}",
                    self.wait_timeout, hash
                )));
            }
            debug!("Transaction {} still pending", hash);
            sleep(self.poll_interval).await;
        }
    }
}

fn parse_balance(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n.as_u64().map(u128::from),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl BalanceProvider for AptosClient {
    async fn fetch_balance(
        &self,
        owner: &str,
        asset_type: &str,
        decimals: u8,
    ) -> Result<TokenBalance, ApiError> {
        if owner.trim().is_empty() {
            return Err(ApiError::validation("User address is required"));
        }
        if asset_type.trim().is_empty() {
            return Err(ApiError::validation("Token address is required"));
        }

        let url = format!(
            "{}/accounts/{}/balance/{}",
            self.node_url,
            owner,
            encode(asset_type)
        );
        debug!("Fetching balance: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Account {} does not hold {}, returning 0", owner, asset_type);
            return Ok(TokenBalance::zero(decimals));
        }
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown status").to_string(),
                body,
            });
        }

        let value: Value = response.json().await?;
        let raw = parse_balance(&value)
            .ok_or_else(|| ApiError::Network(format!("unexpected balance payload: {}", value)))?;

        Ok(TokenBalance::new(raw, decimals))
    }
}
