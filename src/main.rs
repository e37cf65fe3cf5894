use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lending_dashboard::config::AppConfig;
use lending_dashboard::handlers::ConsoleEventHandler;
use lending_dashboard::models::TransactionResult;
use lending_dashboard::traits::data_provider::LendingDataProvider;
use lending_dashboard::Dashboard;

#[derive(Debug, Parser)]
#[command(name = "lending-dashboard", version, about = "Aptos lending dashboard")]
struct Cli {
    /// Backend base URL, overrides EARN_ENV / EARN_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Aptos fullnode URL
    #[arg(long, global = true)]
    node_url: Option<String>,

    /// Wallet to connect before running the command
    #[arg(long, global = true, env = "EARN_WALLET")]
    wallet: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List assets and their markets
    Markets,
    /// Show one market's details
    Details {
        #[arg(long)]
        asset: String,
        #[arg(long)]
        market: String,
    },
    /// Show the connected wallet's portfolio
    Portfolio,
    /// Show the connected wallet's balance of an asset
    Balance {
        #[arg(long)]
        asset: String,
    },
    /// Supply an asset to a market
    Supply {
        #[arg(long)]
        asset: String,
        #[arg(long)]
        amount: String,
        /// Reserve object; defaults to the asset's first market
        #[arg(long)]
        reserve: Option<String>,
    },
    /// Withdraw a supplied asset; `--amount max` withdraws everything
    Withdraw {
        #[arg(long)]
        asset: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        reserve: Option<String>,
        #[arg(long)]
        protocol: Option<String>,
    },
    /// List configured wallets
    Wallets,
}

/// Print a confirmed transaction; a failed one becomes the command's error
fn report(result: &TransactionResult) -> anyhow::Result<()> {
    if !result.success {
        anyhow::bail!(
            "Transaction failed: {}",
            result.error.as_deref().unwrap_or("Unknown error")
        );
    }
    println!("Transaction confirmed: {}", result.hash.as_deref().unwrap_or("-"));
    Ok(())
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::from_config(&config, Arc::new(ConsoleEventHandler::new()))?;
    dashboard.wallet().auto_connect(cli.wallet.as_deref()).await;

    match cli.command {
        Command::Markets => {
            print!("{}", dashboard.render_header().await);
            print!("{}", dashboard.render_markets().await);
        }
        Command::Details { asset, market } => {
            let details = dashboard
                .hooks()
                .provider()
                .get_market_details_by_asset(&asset, &market)
                .await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::Portfolio => {
            print!("{}", dashboard.render_header().await);
            print!("{}", dashboard.render_portfolio().await);
        }
        Command::Balance { asset } => {
            let account = dashboard
                .wallet()
                .account()
                .await
                .context("Connect a wallet with --wallet to read balances")?;
            let assets = dashboard.hooks().assets().await;
            let asset = assets
                .data
                .unwrap_or_default()
                .into_iter()
                .find(|a| a.token_address == asset || a.symbol.eq_ignore_ascii_case(&asset))
                .with_context(|| format!("Unknown asset {}", asset))?;
            let balance = dashboard
                .hooks()
                .token_balance(
                    Some(account.address.as_str()),
                    Some(asset.token_address.as_str()),
                    asset.decimals,
                )
                .await;
            match (balance.data, balance.error) {
                (Some(balance), _) => println!("{}", balance.formatted_amount(&asset.symbol)),
                (None, Some(e)) => return Err(e).context("Failed to fetch balance"),
                (None, None) => println!("-"),
            }
        }
        Command::Supply { asset, amount, reserve } => {
            let result = dashboard.supply(&asset, reserve.as_deref(), &amount).await?;
            report(&result)?;
        }
        Command::Withdraw {
            asset,
            amount,
            reserve,
            protocol,
        } => {
            let result = dashboard
                .withdraw(&asset, reserve.as_deref(), protocol.as_deref(), &amount)
                .await?;
            report(&result)?;
        }
        Command::Wallets => {
            dashboard.header_mut().toggle_selector();
            print!("{}", dashboard.render_header().await);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = &cli.node_url {
        config.node_url = url.trim_end_matches('/').to_string();
    }

    info!("Initializing lending dashboard v{}", lending_dashboard::VERSION);
    info!("Environment: {:?}, API: {}", config.environment, config.api_base_url);

    tokio::runtime::Runtime::new()?.block_on(async {
        if let Err(e) = run(cli, config).await {
            error!("{:#}", e);
            return Err(e);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_transaction_is_an_error() {
        assert!(report(&TransactionResult::confirmed("0xabc")).is_ok());

        let err = report(&TransactionResult::failed("Move abort")).unwrap_err();
        assert_eq!(err.to_string(), "Transaction failed: Move abort");
    }
}
