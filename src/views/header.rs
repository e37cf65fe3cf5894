use std::sync::Arc;

use tracing::error;

use crate::traits::wallet::{WalletAccount, WalletReadyState};
use crate::utils::format_address;
use crate::wallet::WalletContext;

pub const TITLE: &str = "Mock Earn WMW";

/// Outcome of picking a wallet in the selector
#[derive(Debug, Clone, PartialEq)]
pub enum WalletSelection {
    Connected(WalletAccount),
    /// The wallet is not detected; send the user to this page
    Install(Option<String>),
}

/// Title bar with the connected account or the wallet selector
pub struct Header {
    context: Arc<WalletContext>,
    selector_open: bool,
}

impl Header {
    pub fn new(context: Arc<WalletContext>) -> Self {
        Self {
            context,
            selector_open: false,
        }
    }

    pub fn is_selector_open(&self) -> bool {
        self.selector_open
    }

    pub fn toggle_selector(&mut self) {
        self.selector_open = !self.selector_open;
    }

    pub fn close_selector(&mut self) {
        self.selector_open = false;
    }

    /// Connect an installed wallet, or hand back the install link
    pub async fn select(&mut self, name: &str) -> anyhow::Result<WalletSelection> {
        let wallet = self
            .context
            .wallets()
            .iter()
            .find(|w| w.name().eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown wallet {}", name))?;

        if wallet.ready_state() == WalletReadyState::NotDetected {
            return Ok(WalletSelection::Install(wallet.url().map(str::to_string)));
        }

        match self.context.connect(wallet.name()).await {
            Ok(account) => {
                self.selector_open = false;
                Ok(WalletSelection::Connected(account))
            }
            Err(e) => {
                error!("Error connecting to wallet: {:#}", e);
                Err(e)
            }
        }
    }

    pub async fn disconnect(&self) {
        if let Err(e) = self.context.disconnect().await {
            error!("Error disconnecting from wallet: {:#}", e);
        }
    }

    pub async fn render(&self) -> String {
        let mut out = String::new();
        let account = self.context.account().await;

        match account {
            Some(account) => {
                out.push_str(&format!("{}    {}  [Disconnect]\n", TITLE, format_address(&account.address)));
            }
            None => {
                out.push_str(&format!("{}    [Connect Wallet]\n", TITLE));
                if self.selector_open {
                    out.push_str("  Select Wallet\n");
                    let grouped = self.context.grouped();
                    for wallet in grouped.available.iter().chain(grouped.installable.iter()) {
                        match wallet.ready_state() {
                            WalletReadyState::Installed => {
                                out.push_str(&format!("    {}\n", wallet.name()));
                            }
                            WalletReadyState::NotDetected => {
                                out.push_str(&format!("    {}  Install\n", wallet.name()));
                            }
                        }
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HttpWalletBridge;
    use crate::traits::wallet::WalletAdapter;

    fn context() -> Arc<WalletContext> {
        let wallets: Vec<Arc<dyn WalletAdapter>> = vec![
            Arc::new(
                HttpWalletBridge::new("Rise", None)
                    .with_install_url(Some("https://risewallet.io".into())),
            ),
            Arc::new(HttpWalletBridge::new("Nightly", None)),
            Arc::new(HttpWalletBridge::new("Petra", Some("http://127.0.0.1:1".into()))),
        ];
        Arc::new(WalletContext::new(wallets))
    }

    #[tokio::test]
    async fn disconnected_header_lists_wallets_when_open() {
        let mut header = Header::new(context());
        let closed = header.render().await;
        assert!(closed.contains("[Connect Wallet]"));
        assert!(!closed.contains("Select Wallet"));

        header.toggle_selector();
        let open = header.render().await;
        let petra = open.find("Petra").unwrap();
        let rise = open.find("Rise  Install").unwrap();
        assert!(petra < rise);
    }

    #[tokio::test]
    async fn not_detected_wallet_returns_install_link() {
        let mut header = Header::new(context());
        header.toggle_selector();
        let selection = header.select("rise").await.unwrap();
        assert_eq!(
            selection,
            WalletSelection::Install(Some("https://risewallet.io".into()))
        );
        assert!(header.is_selector_open());

        let selection = header.select("nightly").await.unwrap();
        assert_eq!(selection, WalletSelection::Install(None));
        assert!(header.select("Fewcha").await.is_err());
    }
}
