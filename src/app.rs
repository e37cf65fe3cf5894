use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::models::{Asset, MarketData, TransactionResult};
use crate::providers::{AptosClient, HttpWalletBridge, RestApiClient};
use crate::query::Hooks;
use crate::services::{execute_supply, execute_withdraw};
use crate::traits::chain_client::TransactionWaiter;
use crate::traits::event_handler::{TransactionEvent, TransactionEventHandler, TransactionKind};
use crate::traits::wallet::WalletAdapter;
use crate::views::{asset_list, Header, PendingSubmission, PortfolioPanel, SupplyModal, WithdrawModal};
use crate::wallet::WalletContext;

/// The application shell: wallet, cached data, views and transactions
pub struct Dashboard {
    wallet: Arc<WalletContext>,
    hooks: Hooks,
    waiter: Arc<dyn TransactionWaiter>,
    events: Arc<dyn TransactionEventHandler>,
    header: Header,
    supply_modal: SupplyModal,
    withdraw_modal: WithdrawModal,
}

impl Dashboard {
    pub fn new(
        wallet: Arc<WalletContext>,
        hooks: Hooks,
        waiter: Arc<dyn TransactionWaiter>,
        events: Arc<dyn TransactionEventHandler>,
    ) -> Self {
        Self {
            header: Header::new(wallet.clone()),
            wallet,
            hooks,
            waiter,
            events,
            supply_modal: SupplyModal::new(),
            withdraw_modal: WithdrawModal::new(),
        }
    }

    /// Wire the HTTP clients and wallet bridges described by `config`
    pub fn from_config(
        config: &AppConfig,
        events: Arc<dyn TransactionEventHandler>,
    ) -> anyhow::Result<Self> {
        let api = RestApiClient::with_timeout(&config.api_base_url, config.http_timeout)
            .context("Failed to build API client")?;
        let chain = Arc::new(AptosClient::new(&config.node_url).with_wait_timeout(config.tx_wait_timeout));

        let wallets: Vec<Arc<dyn WalletAdapter>> = config
            .wallets
            .iter()
            .map(|w| {
                let bridge = HttpWalletBridge::new(&w.name, w.url.clone())
                    .with_install_url(w.install_url.clone());
                Arc::new(bridge) as Arc<dyn WalletAdapter>
            })
            .collect();

        info!(
            "Dashboard using API {} and node {} with {} wallet(s)",
            config.api_base_url,
            config.node_url,
            wallets.len()
        );

        Ok(Self::new(
            Arc::new(WalletContext::new(wallets)),
            Hooks::new(Arc::new(api), chain.clone()),
            chain,
            events,
        ))
    }

    pub fn wallet(&self) -> &Arc<WalletContext> {
        &self.wallet
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn supply_modal(&self) -> &SupplyModal {
        &self.supply_modal
    }

    pub fn withdraw_modal(&self) -> &WithdrawModal {
        &self.withdraw_modal
    }

    async fn user_address(&self) -> Option<String> {
        self.wallet.account().await.map(|a| a.address)
    }

    pub async fn render_header(&self) -> String {
        self.header.render().await
    }

    pub async fn render_markets(&self) -> String {
        let assets = self.hooks.assets().await;
        let Some(list) = assets.data else {
            return match assets.error {
                Some(e) => format!("Markets\n  Error loading assets: {}\n", e),
                None => "Markets\n  Loading assets...\n".to_string(),
            };
        };

        let view = self.hooks.assets_with_markets(&list).await;
        asset_list::render(&view)
    }

    pub async fn render_portfolio(&self) -> String {
        let user = self.user_address().await;
        let portfolio = self.hooks.user_portfolio(user.as_deref()).await;
        let assets = if user.is_some() {
            self.hooks.assets().await.data.unwrap_or_default()
        } else {
            Vec::new()
        };

        PortfolioPanel::new(user.as_deref(), &portfolio, &assets).render()
    }

    /// Find an asset by token address or symbol
    async fn resolve_asset(&self, asset: &str) -> anyhow::Result<Asset> {
        let assets = self.hooks.assets().await;
        if let Some(e) = assets.error.filter(|_| assets.data.is_none()) {
            return Err(e).context("Failed to load assets");
        }

        assets
            .data
            .unwrap_or_default()
            .into_iter()
            .find(|a| a.token_address == asset || a.symbol.eq_ignore_ascii_case(asset))
            .ok_or_else(|| anyhow::anyhow!("Unknown asset {}", asset))
    }

    /// Pick the requested reserve, or the asset's first market
    async fn resolve_market(&self, asset: &Asset, reserve: Option<&str>) -> anyhow::Result<MarketData> {
        let result = self
            .hooks
            .markets_by_asset(Some(asset.token_address.as_str()))
            .await;
        let market = match (result.data, result.error) {
            (Some(market), _) => market,
            (None, Some(e)) => return Err(e).context(format!("Failed to load markets for {}", asset.symbol)),
            (None, None) => anyhow::bail!("Markets for {} are still loading", asset.symbol),
        };

        let found = match reserve {
            Some(reserve) => market.find_reserve(reserve).cloned(),
            None => market.markets.into_iter().next(),
        };
        found.ok_or_else(|| anyhow::anyhow!("No market available for {}", asset.symbol))
    }

    /// Open the supply modal with the user's wallet balance filled in
    pub async fn open_supply(&mut self, asset: &str, reserve: Option<&str>) -> anyhow::Result<()> {
        let asset = self.resolve_asset(asset).await?;
        let market = self.resolve_market(&asset, reserve).await?;
        let user = self.user_address().await;

        let balance = self
            .hooks
            .token_balance(user.as_deref(), Some(asset.token_address.as_str()), asset.decimals)
            .await;

        self.supply_modal.open(asset, market);
        self.supply_modal.set_balance(balance.data);
        Ok(())
    }

    /// Supplied balance of a position; `protocol` picks one, otherwise the first holding it
    async fn supplied_balance(&self, asset: &Asset, protocol: Option<&str>) -> anyhow::Result<Decimal> {
        let user = self.user_address().await;
        let portfolio = self.hooks.user_portfolio(user.as_deref()).await;
        let Some(portfolio) = portfolio.data else {
            return match portfolio.error {
                Some(e) => Err(e).context("Failed to load portfolio"),
                None => Ok(Decimal::ZERO),
            };
        };

        let supplied = portfolio
            .renderable_protocols()
            .filter(|(name, _)| protocol.map(|p| p == name.as_str()).unwrap_or(true))
            .filter_map(|(_, p)| p.position(&asset.token_address))
            .map(|position| position.supplied(asset.decimals))
            .find(|supplied| !supplied.is_zero())
            .unwrap_or(Decimal::ZERO);
        Ok(supplied)
    }

    pub async fn open_withdraw(
        &mut self,
        asset: &str,
        reserve: Option<&str>,
        protocol: Option<&str>,
    ) -> anyhow::Result<()> {
        let asset = self.resolve_asset(asset).await?;
        let market = self.resolve_market(&asset, reserve).await?;
        let supplied = self.supplied_balance(&asset, protocol).await?;

        self.withdraw_modal.open(asset, market, supplied);
        Ok(())
    }

    /// Supply `amount` of `asset`; validation problems come back as `Err`
    pub async fn supply(
        &mut self,
        asset: &str,
        reserve: Option<&str>,
        amount: &str,
    ) -> anyhow::Result<TransactionResult> {
        self.open_supply(asset, reserve).await?;
        self.supply_modal.set_amount(amount);

        let user = self.user_address().await;
        let Some(pending) = self.supply_modal.begin_submit(user.as_deref()) else {
            anyhow::bail!("{}", self.supply_modal.error().unwrap_or("Supply unavailable"));
        };

        let result = self.run(TransactionKind::Supply, &pending).await;
        self.supply_modal.finish_submit(result.success);
        Ok(result)
    }

    /// Withdraw `amount` of a supplied `asset`; the ceiling is the supplied balance
    pub async fn withdraw(
        &mut self,
        asset: &str,
        reserve: Option<&str>,
        protocol: Option<&str>,
        amount: &str,
    ) -> anyhow::Result<TransactionResult> {
        self.open_withdraw(asset, reserve, protocol).await?;
        if amount.trim().eq_ignore_ascii_case("max") {
            self.withdraw_modal.max();
        } else {
            self.withdraw_modal.set_amount(amount);
        }

        let user = self.user_address().await;
        let Some(pending) = self.withdraw_modal.begin_submit(user.as_deref()) else {
            anyhow::bail!("{}", self.withdraw_modal.error().unwrap_or("Withdraw unavailable"));
        };

        let result = self.run(TransactionKind::Withdraw, &pending).await;
        self.withdraw_modal.finish_submit(result.success);
        Ok(result)
    }

    async fn run(&self, kind: TransactionKind, pending: &PendingSubmission) -> TransactionResult {
        let event = TransactionEvent {
            kind,
            symbol: pending.asset.symbol.clone(),
            amount: pending.amount.clone(),
            user_address: pending.user_address.clone(),
        };
        self.events.on_submitted(&event).await;

        let params = pending.params();
        let result = match kind {
            TransactionKind::Supply => {
                execute_supply(&params, self.wallet.as_ref(), self.waiter.as_ref()).await
            }
            TransactionKind::Withdraw => {
                execute_withdraw(&params, self.wallet.as_ref(), self.waiter.as_ref()).await
            }
        };

        if result.success {
            debug!("Invalidating cached state of {}", pending.user_address);
            self.hooks.invalidate_user(&pending.user_address);
        }
        self.events.on_settled(&event, &result).await;
        result
    }
}
