use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::TransactionError;
use crate::models::{EntryFunctionPayload, SubmitResponse};
use crate::traits::wallet::{TransactionSigner, WalletAccount, WalletAdapter, WalletReadyState};

struct Connection {
    wallet: Arc<dyn WalletAdapter>,
    account: WalletAccount,
}

/// Wallets split the way the selector shows them
pub struct GroupedWallets {
    pub available: Vec<Arc<dyn WalletAdapter>>,
    pub installable: Vec<Arc<dyn WalletAdapter>>,
}

/// Process-wide wallet connection shared by every view and service
pub struct WalletContext {
    wallets: Vec<Arc<dyn WalletAdapter>>,
    connection: RwLock<Option<Connection>>,
}

impl WalletContext {
    /// Create a new, disconnected context
    pub fn new(wallets: Vec<Arc<dyn WalletAdapter>>) -> Self {
        Self {
            wallets,
            connection: RwLock::new(None),
        }
    }

    pub fn wallets(&self) -> &[Arc<dyn WalletAdapter>] {
        &self.wallets
    }

    /// Installed wallets first, each group sorted by name
    pub fn grouped(&self) -> GroupedWallets {
        let mut available: Vec<_> = self
            .wallets
            .iter()
            .filter(|w| w.ready_state() == WalletReadyState::Installed)
            .cloned()
            .collect();
        let mut installable: Vec<_> = self
            .wallets
            .iter()
            .filter(|w| w.ready_state() == WalletReadyState::NotDetected)
            .cloned()
            .collect();

        available.sort_by(|a, b| a.name().cmp(b.name()));
        installable.sort_by(|a, b| a.name().cmp(b.name()));
        GroupedWallets {
            available,
            installable,
        }
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn WalletAdapter>> {
        self.wallets
            .iter()
            .find(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// Connect through the named wallet, replacing any current connection
    pub async fn connect(&self, name: &str) -> anyhow::Result<WalletAccount> {
        let wallet = self
            .find(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown wallet {}", name))?;

        if wallet.ready_state() == WalletReadyState::NotDetected {
            anyhow::bail!(
                "Wallet {} is not installed{}",
                wallet.name(),
                wallet.url().map(|u| format!(", install it from {}", u)).unwrap_or_default()
            );
        }

        let account = match wallet.connect().await {
            Ok(account) => account,
            Err(e) => {
                warn!("Error connecting to wallet {}: {:#}", wallet.name(), e);
                return Err(e);
            }
        };

        let previous = self.connection.write().await.replace(Connection {
            wallet: wallet.clone(),
            account: account.clone(),
        });
        if let Some(previous) = previous {
            if previous.wallet.name() != wallet.name() {
                if let Err(e) = previous.wallet.disconnect().await {
                    warn!("Error disconnecting from wallet {}: {:#}", previous.wallet.name(), e);
                }
            }
        }

        info!("Connected {} via {}", account.address, wallet.name());
        Ok(account)
    }

    /// Connect to `preferred` when it is installed; otherwise stay disconnected
    pub async fn auto_connect(&self, preferred: Option<&str>) -> Option<WalletAccount> {
        let name = preferred?;
        match self.connect(name).await {
            Ok(account) => Some(account),
            Err(e) => {
                warn!("Wallet adapter error: {:#}", e);
                None
            }
        }
    }

    pub async fn disconnect(&self) -> anyhow::Result<()> {
        let previous = self.connection.write().await.take();
        if let Some(connection) = previous {
            info!("Disconnecting {}", connection.wallet.name());
            connection.wallet.disconnect().await?;
        }
        Ok(())
    }

    pub async fn account(&self) -> Option<WalletAccount> {
        self.connection
            .read()
            .await
            .as_ref()
            .map(|c| c.account.clone())
    }

    pub async fn connected_wallet(&self) -> Option<String> {
        self.connection
            .read()
            .await
            .as_ref()
            .map(|c| c.wallet.name().to_string())
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.read().await.is_some()
    }
}

#[async_trait]
impl TransactionSigner for WalletContext {
    async fn sign_and_submit(&self, payload: &EntryFunctionPayload) -> anyhow::Result<SubmitResponse> {
        let wallet = self
            .connection
            .read()
            .await
            .as_ref()
            .map(|c| c.wallet.clone())
            .ok_or(TransactionError::WalletNotConnected)?;

        wallet.sign_and_submit(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FakeWallet {
        name: &'static str,
        installed: bool,
        disconnects: AtomicU32,
    }

    impl FakeWallet {
        fn new(name: &'static str, installed: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                installed,
                disconnects: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl TransactionSigner for FakeWallet {
        async fn sign_and_submit(&self, _payload: &EntryFunctionPayload) -> anyhow::Result<SubmitResponse> {
            Ok(SubmitResponse {
                hash: Some(format!("0x{}", self.name.to_lowercase())),
            })
        }
    }

    #[async_trait]
    impl WalletAdapter for FakeWallet {
        fn name(&self) -> &str {
            self.name
        }

        fn url(&self) -> Option<&str> {
            Some("https://wallet.example")
        }

        fn ready_state(&self) -> WalletReadyState {
            if self.installed {
                WalletReadyState::Installed
            } else {
                WalletReadyState::NotDetected
            }
        }

        async fn connect(&self) -> anyhow::Result<WalletAccount> {
            Ok(WalletAccount {
                address: format!("0x{}", self.name.to_lowercase()),
            })
        }

        async fn disconnect(&self) -> anyhow::Result<()> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn connect_and_disconnect_lifecycle() {
        let petra = FakeWallet::new("Petra", true);
        let context = WalletContext::new(vec![petra.clone()]);
        assert!(!context.is_connected().await);

        let account = context.connect("petra").await.unwrap();
        assert_eq!(account.address, "0xpetra");
        assert_eq!(context.connected_wallet().await.as_deref(), Some("Petra"));

        context.disconnect().await.unwrap();
        assert!(context.account().await.is_none());
        assert_eq!(petra.disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn signing_requires_a_connection() {
        let context = WalletContext::new(vec![FakeWallet::new("Petra", true)]);
        let payload = EntryFunctionPayload::new("0x1::m::f", vec![]);

        let err = context.sign_and_submit(&payload).await.unwrap_err();
        assert_eq!(err.to_string(), "Wallet not connected");

        context.connect("Petra").await.unwrap();
        let response = context.sign_and_submit(&payload).await.unwrap();
        assert_eq!(response.hash.as_deref(), Some("0xpetra"));
    }

    #[tokio::test]
    async fn not_detected_wallet_points_to_install() {
        let context = WalletContext::new(vec![FakeWallet::new("Martian", false)]);
        let err = context.connect("Martian").await.unwrap_err();
        assert!(err.to_string().contains("install it from https://wallet.example"));
        assert!(context.auto_connect(Some("Martian")).await.is_none());
    }

    #[tokio::test]
    async fn switching_wallets_disconnects_the_previous_one() {
        let petra = FakeWallet::new("Petra", true);
        let pontem = FakeWallet::new("Pontem", true);
        let context = WalletContext::new(vec![petra.clone(), pontem.clone()]);

        context.connect("Petra").await.unwrap();
        context.connect("Pontem").await.unwrap();

        assert_eq!(petra.disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(context.account().await.unwrap().address, "0xpontem");
    }

    #[test]
    fn groups_installed_wallets_first() {
        let context = WalletContext::new(vec![
            FakeWallet::new("Rise", false),
            FakeWallet::new("Petra", true),
            FakeWallet::new("Martian", true),
        ]);
        let grouped = context.grouped();
        let available: Vec<_> = grouped.available.iter().map(|w| w.name().to_string()).collect();
        let installable: Vec<_> = grouped.installable.iter().map(|w| w.name().to_string()).collect();
        assert_eq!(available, vec!["Martian", "Petra"]);
        assert_eq!(installable, vec!["Rise"]);
    }
}
