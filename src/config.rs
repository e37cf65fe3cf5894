//! Runtime configuration, read from the environment (and `.env` via dotenvy)

use std::time::Duration;

use anyhow::Context;

pub const PRODUCTION_API_URL: &str = "https://earn-backend-j1m2.onrender.com";
pub const DEVELOPMENT_API_URL: &str = "http://127.0.0.1:5173/api";
pub const MAINNET_NODE_URL: &str = "https://api.mainnet.aptoslabs.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(anyhow::anyhow!("Unknown environment {}", other)),
        }
    }
}

/// A wallet the user may connect through; no bridge URL means not detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletBridgeConfig {
    pub name: String,
    pub url: Option<String>,
    /// Page offered to users who do not have the wallet yet
    pub install_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base_url: String,
    pub node_url: String,
    pub wallets: Vec<WalletBridgeConfig>,
    pub http_timeout: Duration,
    pub tx_wait_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            api_base_url: PRODUCTION_API_URL.to_string(),
            node_url: MAINNET_NODE_URL.to_string(),
            wallets: Vec::new(),
            http_timeout: Duration::from_secs(15),
            tx_wait_timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = match lookup("EARN_ENV") {
            Some(value) => value.parse().context("parse EARN_ENV")?,
            None => defaults.environment,
        };

        let api_base_url = match lookup("EARN_API_URL") {
            Some(url) => url,
            None => match environment {
                Environment::Development => lookup("EARN_DEV_API_URL")
                    .unwrap_or_else(|| DEVELOPMENT_API_URL.to_string()),
                Environment::Production => PRODUCTION_API_URL.to_string(),
            },
        };

        let node_url = lookup("APTOS_NODE_URL").unwrap_or(defaults.node_url);

        let wallets = lookup("WALLET_BRIDGES")
            .map(|s| parse_wallet_bridges(&s))
            .unwrap_or_default();

        let http_timeout = parse_millis(&lookup, "HTTP_TIMEOUT_MS")?.unwrap_or(defaults.http_timeout);
        let tx_wait_timeout =
            parse_millis(&lookup, "TX_WAIT_TIMEOUT_MS")?.unwrap_or(defaults.tx_wait_timeout);

        Ok(Self {
            environment,
            api_base_url: trim_base(&api_base_url),
            node_url: trim_base(&node_url),
            wallets,
            http_timeout,
            tx_wait_timeout,
        })
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> anyhow::Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("parse {} from '{}'", key, v))
        })
        .transpose()
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_empty(url: &str) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| trim_base(url))
}

/// Parse `name=bridge|install,name2=|install` into wallet entries
pub fn parse_wallet_bridges(s: &str) -> Vec<WalletBridgeConfig> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, urls) = entry.split_once('=').unwrap_or((entry, ""));
            let (url, install_url) = urls.split_once('|').unwrap_or((urls, ""));
            WalletBridgeConfig {
                name: name.trim().to_string(),
                url: non_empty(url),
                install_url: non_empty(install_url),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_production_backend() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url, PRODUCTION_API_URL);
        assert_eq!(config.node_url, MAINNET_NODE_URL);
        assert!(config.wallets.is_empty());
    }

    #[test]
    fn development_uses_proxy_base() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EARN_ENV", "development"),
            ("EARN_DEV_API_URL", "http://localhost:9000/api/"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000/api");
    }

    #[test]
    fn explicit_url_wins_over_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("EARN_ENV", "dev"),
            ("EARN_API_URL", "http://backend.test"),
            ("TX_WAIT_TIMEOUT_MS", "5000"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "http://backend.test");
        assert_eq!(config.tx_wait_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("EARN_ENV", "staging")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("HTTP_TIMEOUT_MS", "soon")])).is_err());
    }

    #[test]
    fn parses_wallet_bridges() {
        let wallets = parse_wallet_bridges(
            "Petra=http://127.0.0.1:8787/, Martian=|https://martianwallet.xyz/,Pontem",
        );
        assert_eq!(
            wallets,
            vec![
                WalletBridgeConfig {
                    name: "Petra".into(),
                    url: Some("http://127.0.0.1:8787".into()),
                    install_url: None,
                },
                WalletBridgeConfig {
                    name: "Martian".into(),
                    url: None,
                    install_url: Some("https://martianwallet.xyz".into()),
                },
                WalletBridgeConfig {
                    name: "Pontem".into(),
                    url: None,
                    install_url: None,
                },
            ]
        );
    }
}
