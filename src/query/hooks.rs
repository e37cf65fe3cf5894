use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info};

use super::cache::{QueryCache, QueryResult};
use super::policy::QueryPolicy;
use crate::errors::ApiError;
use crate::models::{Asset, Market, TokenBalance, UserPortfolio};
use crate::traits::chain_client::BalanceProvider;
use crate::traits::data_provider::LendingDataProvider;

const ASSETS_KEY: &str = "assets";

/// Identity of a token balance query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenBalanceKey {
    pub user_address: String,
    pub token_address: String,
    pub decimals: u8,
}

/// One asset joined with its markets
#[derive(Debug, Clone)]
pub struct AssetWithMarkets {
    pub asset: Asset,
    pub markets: Market,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

/// Markets of every asset, tolerating per-asset failures
#[derive(Debug, Clone, Default)]
pub struct AssetsWithMarkets {
    pub assets_with_markets: Vec<AssetWithMarkets>,
    /// True while any per-asset fetch is pending
    pub is_loading: bool,
    /// Every per-asset failure, keyed by token address
    pub errors: Vec<(String, ApiError)>,
}

impl AssetsWithMarkets {
    fn combine(assets: &[Asset], results: Vec<QueryResult<Market>>) -> Self {
        let mut combined = Self::default();

        for (asset, result) in assets.iter().zip(results) {
            combined.is_loading |= result.is_loading;
            if let Some(err) = &result.error {
                combined
                    .errors
                    .push((asset.token_address.clone(), err.clone()));
            }
            combined.assets_with_markets.push(AssetWithMarkets {
                asset: asset.clone(),
                markets: result.data.unwrap_or_else(|| Market::empty_for(asset)),
                is_loading: result.is_loading,
                error: result.error,
            });
        }

        combined
    }

    /// Entry for an asset by token address
    pub fn get(&self, token_address: &str) -> Option<&AssetWithMarkets> {
        self.assets_with_markets
            .iter()
            .find(|a| a.asset.token_address == token_address)
    }
}

/// Cached, retrying access to every resource the dashboard shows
pub struct Hooks {
    provider: Arc<dyn LendingDataProvider>,
    balances: Arc<dyn BalanceProvider>,
    assets: QueryCache<&'static str, Vec<Asset>>,
    markets: QueryCache<String, Market>,
    portfolios: QueryCache<String, UserPortfolio>,
    token_balances: QueryCache<TokenBalanceKey, TokenBalance>,
}

impl Hooks {
    /// Create hooks with the standard policies
    pub fn new(provider: Arc<dyn LendingDataProvider>, balances: Arc<dyn BalanceProvider>) -> Self {
        Self::with_retry_delay(provider, balances, None)
    }

    /// Create hooks, overriding the pause between retries
    pub fn with_retry_delay(
        provider: Arc<dyn LendingDataProvider>,
        balances: Arc<dyn BalanceProvider>,
        retry_delay: Option<Duration>,
    ) -> Self {
        let policy = |p: QueryPolicy| match retry_delay {
            Some(delay) => p.with_retry_delay(delay),
            None => p,
        };

        Self {
            provider,
            balances,
            assets: QueryCache::new("assets", policy(QueryPolicy::ASSETS)),
            markets: QueryCache::new("markets", policy(QueryPolicy::MARKETS)),
            portfolios: QueryCache::new("portfolio", policy(QueryPolicy::USER_PORTFOLIO)),
            token_balances: QueryCache::new("tokenBalance", policy(QueryPolicy::TOKEN_BALANCE)),
        }
    }

    pub fn provider(&self) -> &Arc<dyn LendingDataProvider> {
        &self.provider
    }

    /// All listed assets
    pub async fn assets(&self) -> QueryResult<Vec<Asset>> {
        let provider = &self.provider;
        self.assets
            .fetch(ASSETS_KEY, move || async move { provider.get_assets().await })
            .await
    }

    /// Markets of one asset; disabled without an address
    pub async fn markets_by_asset(&self, asset_address: Option<&str>) -> QueryResult<Market> {
        let Some(address) = asset_address.filter(|a| !a.is_empty()) else {
            return QueryResult::idle();
        };
        self.fetch_markets(address).await
    }

    async fn fetch_markets(&self, address: &str) -> QueryResult<Market> {
        let provider = &self.provider;
        self.markets
            .fetch(address.to_string(), move || async move {
                provider.get_markets_by_asset(address).await
            })
            .await
    }

    /// Portfolio of a user; disabled without an address
    pub async fn user_portfolio(&self, user_address: Option<&str>) -> QueryResult<UserPortfolio> {
        let Some(address) = user_address.filter(|a| !a.is_empty()) else {
            return QueryResult::idle();
        };
        let provider = &self.provider;
        self.portfolios
            .fetch(address.to_string(), move || async move {
                provider.get_user_portfolio(address).await
            })
            .await
    }

    /// Wallet balance of a token; disabled unless both addresses are known
    pub async fn token_balance(
        &self,
        user_address: Option<&str>,
        token_address: Option<&str>,
        decimals: u8,
    ) -> QueryResult<TokenBalance> {
        let (Some(user), Some(token)) = (
            user_address.filter(|a| !a.is_empty()),
            token_address.filter(|a| !a.is_empty()),
        ) else {
            return QueryResult::idle();
        };

        self.fetch_token_balance(TokenBalanceKey {
            user_address: user.to_string(),
            token_address: token.to_string(),
            decimals,
        })
        .await
    }

    async fn fetch_token_balance(&self, key: TokenBalanceKey) -> QueryResult<TokenBalance> {
        let balances = &self.balances;
        let request = key.clone();
        let request = &request;
        self.token_balances
            .fetch(key, move || async move {
                balances
                    .fetch_balance(&request.user_address, &request.token_address, request.decimals)
                    .await
            })
            .await
    }

    /// Markets of every asset, fetched concurrently.
    ///
    /// Each asset settles on its own; a failure never hides the others.
    pub async fn assets_with_markets(&self, assets: &[Asset]) -> AssetsWithMarkets {
        debug!("Fetching markets for {} assets", assets.len());
        let results = join_all(
            assets
                .iter()
                .map(|asset| self.fetch_markets(&asset.token_address)),
        )
        .await;

        let combined = AssetsWithMarkets::combine(assets, results);
        if !combined.errors.is_empty() {
            info!(
                "{} of {} market fetches failed",
                combined.errors.len(),
                assets.len()
            );
        }
        combined
    }

    /// Same view as [`Hooks::assets_with_markets`], read from cache without fetching
    pub fn assets_with_markets_snapshot(&self, assets: &[Asset]) -> AssetsWithMarkets {
        let results = assets
            .iter()
            .map(|asset| self.markets.snapshot(&asset.token_address))
            .collect();
        AssetsWithMarkets::combine(assets, results)
    }

    /// Refetch stale data of the resources that follow focus
    pub async fn on_focus(&self) {
        if self.portfolios.policy().refetch_on_focus {
            for user in self.portfolios.stale_keys() {
                self.user_portfolio(Some(user.as_str())).await;
            }
        }
        if self.token_balances.policy().refetch_on_focus {
            for key in self.token_balances.stale_keys() {
                self.fetch_token_balance(key).await;
            }
        }
        if self.markets.policy().refetch_on_focus {
            for address in self.markets.stale_keys() {
                self.fetch_markets(&address).await;
            }
        }
        if self.assets.policy().refetch_on_focus && !self.assets.stale_keys().is_empty() {
            self.assets().await;
        }
    }

    /// Mark everything derived from a user's on-chain state stale
    pub fn invalidate_user(&self, user_address: &str) {
        self.portfolios.invalidate(&user_address.to_string());
        for key in self.token_balances.keys_matching(|k| k.user_address == user_address) {
            self.token_balances.invalidate(&key);
        }
    }

    /// Mark every asset's markets stale
    pub fn invalidate_markets(&self) {
        self.markets.invalidate_all();
    }

    /// Evict entries past their retention window
    pub fn collect_garbage(&self) {
        self.assets.collect_garbage();
        self.markets.collect_garbage();
        self.portfolios.collect_garbage();
        self.token_balances.collect_garbage();
    }
}
