use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::models::{EntryFunctionPayload, SubmitResponse};
use crate::traits::wallet::{TransactionSigner, WalletAccount, WalletAdapter, WalletReadyState};

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: String,
}

/// Wallet reached through a local HTTP signing bridge.
///
/// The bridge owns the keys and any user prompt; this side only forwards
/// payloads and reads back the submitted hash.
pub struct HttpWalletBridge {
    name: String,
    url: Option<String>,
    install_url: Option<String>,
    client: Client,
}

impl HttpWalletBridge {
    /// Create a new bridge adapter; no URL means the wallet is not detected
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url: url.map(|u| u.trim_end_matches('/').to_string()),
            install_url: None,
            client: Client::new(),
        }
    }

    /// Set the page users are sent to when the wallet is not detected
    pub fn with_install_url(mut self, install_url: Option<String>) -> Self {
        self.install_url = install_url;
        self
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<String> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Wallet {} is not installed", self.name))?;
        Ok(format!("{}{}", url, path))
    }
}

#[async_trait]
impl TransactionSigner for HttpWalletBridge {
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> anyhow::Result<SubmitResponse> {
        let url = self.endpoint("/sign-and-submit")?;
        debug!("Forwarding {} to wallet {}", payload.function, self.name);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "data": payload }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Wallet {} rejected the transaction ({}): {}", self.name, status, text);
        }

        Ok(response.json::<SubmitResponse>().await?)
    }
}

#[async_trait]
impl WalletAdapter for HttpWalletBridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        self.install_url.as_deref()
    }

    fn ready_state(&self) -> WalletReadyState {
        if self.url.is_some() {
            WalletReadyState::Installed
        } else {
            WalletReadyState::NotDetected
        }
    }

    async fn connect(&self) -> anyhow::Result<WalletAccount> {
        let url = self.endpoint("/account")?;
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Wallet {} refused connection ({})", self.name, status);
        }

        let account: AccountResponse = response.json().await?;
        info!("Wallet {} connected as {}", self.name, account.address);
        Ok(WalletAccount {
            address: account.address,
        })
    }
}
