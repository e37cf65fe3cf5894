use super::position_card::PositionCard;
use crate::models::{Asset, ProtocolPortfolio, UserPortfolio, FALLBACK_POSITION_DECIMALS};
use crate::query::QueryResult;
use crate::utils::{format_base_currency, format_bps, format_health_factor};

/// What the panel shows for one protocol
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolSection {
    Loaded {
        protocol: String,
        total_collateral: String,
        total_debt: String,
        available_borrows: String,
        ltv: String,
        liquidation_threshold: String,
        health_factor: String,
        positions: Vec<PositionCard>,
    },
    Failed {
        protocol: String,
        error: String,
    },
}

/// A user's positions grouped by protocol
pub struct PortfolioPanel<'a> {
    user_address: Option<&'a str>,
    result: &'a QueryResult<UserPortfolio>,
    assets: &'a [Asset],
}

impl<'a> PortfolioPanel<'a> {
    pub fn new(
        user_address: Option<&'a str>,
        result: &'a QueryResult<UserPortfolio>,
        assets: &'a [Asset],
    ) -> Self {
        Self {
            user_address,
            result,
            assets,
        }
    }

    fn decimals_for(&self, token_address: &str) -> u8 {
        self.assets
            .iter()
            .find(|a| a.token_address == token_address)
            .map(|a| a.decimals)
            .unwrap_or(FALLBACK_POSITION_DECIMALS)
    }

    fn loaded(&self, name: &str, protocol: &ProtocolPortfolio) -> ProtocolSection {
        ProtocolSection::Loaded {
            protocol: name.to_string(),
            total_collateral: format_base_currency(&protocol.total_collateral_base),
            total_debt: format_base_currency(&protocol.total_debt_base),
            available_borrows: format_base_currency(&protocol.available_borrows_base),
            ltv: format_bps(&protocol.ltv),
            liquidation_threshold: format_bps(&protocol.current_liquidation_threshold),
            health_factor: format_health_factor(&protocol.health_factor),
            positions: protocol
                .user_asset_data
                .iter()
                .filter_map(|p| PositionCard::new(p, self.decimals_for(&p.token_address)))
                .collect(),
        }
    }

    /// Sections in protocol order; errored protocols never show data
    pub fn sections(&self) -> Vec<ProtocolSection> {
        let Some(portfolio) = &self.result.data else {
            return Vec::new();
        };

        let mut sections: Vec<ProtocolSection> = portfolio
            .renderable_protocols()
            .map(|(name, protocol)| self.loaded(name, protocol))
            .collect();
        sections.extend(portfolio.errors.iter().map(|(protocol, error)| {
            ProtocolSection::Failed {
                protocol: protocol.clone(),
                error: error.clone(),
            }
        }));
        sections
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Your Portfolio\n");

        if self.user_address.is_none() {
            out.push_str("  Connect your wallet to view your positions\n");
            return out;
        }
        if self.result.is_loading {
            out.push_str("  Loading portfolio...\n");
            return out;
        }
        if let Some(err) = &self.result.error {
            out.push_str(&format!("  Error: {}\n", err));
            if self.result.data.is_none() {
                return out;
            }
        }

        let sections = self.sections();
        if sections.is_empty() {
            out.push_str("  No positions\n");
            return out;
        }

        for section in sections {
            match section {
                ProtocolSection::Loaded {
                    protocol,
                    total_collateral,
                    total_debt,
                    available_borrows,
                    ltv,
                    liquidation_threshold,
                    health_factor,
                    positions,
                } => {
                    out.push_str(&format!("  [{}]\n", protocol));
                    out.push_str(&format!(
                        "    Collateral: {}  Debt: {}  Available: {}\n",
                        total_collateral, total_debt, available_borrows
                    ));
                    out.push_str(&format!(
                        "    LTV: {}  Liquidation threshold: {}  Health factor: {}\n",
                        ltv, liquidation_threshold, health_factor
                    ));
                    if positions.is_empty() {
                        out.push_str("    No active positions\n");
                    }
                    for card in positions {
                        for line in card.render().lines() {
                            out.push_str(&format!("    {}\n", line));
                        }
                    }
                }
                ProtocolSection::Failed { protocol, error } => {
                    out.push_str(&format!("  [{}] Error: {}\n", protocol, error));
                }
            }
        }

        out
    }
}
