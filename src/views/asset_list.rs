use chrono::{TimeZone, Utc};

use crate::models::MarketData;
use crate::query::AssetsWithMarkets;
use crate::utils::{format_apy, shorten};

fn format_updated(timestamp: &str) -> String {
    timestamp
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn render_market(out: &mut String, market: &MarketData) {
    out.push_str(&format!(
        "    Reserve {}  Supply APY {}  Borrow APY {}\n",
        shorten(&market.reserve_object, 6, 4),
        format_apy(market.supply_apy),
        format_apy(market.borrow_apy)
    ));
    out.push_str(&format!(
        "      Total supplied {:.2}  Total borrowed {:.2}  Updated {}\n",
        market.total_a_token_supply,
        market.total_variable_debt,
        format_updated(&market.last_update_timestamp)
    ));
}

/// Every asset with its markets, one block per asset
pub fn render(view: &AssetsWithMarkets) -> String {
    let mut out = String::from("Markets\n");

    if view.assets_with_markets.is_empty() {
        out.push_str(if view.is_loading {
            "  Loading assets...\n"
        } else {
            "  No assets available\n"
        });
        return out;
    }

    for entry in &view.assets_with_markets {
        let asset = &entry.asset;
        out.push_str(&format!(
            "  {} ({})  {}  decimals {}\n",
            asset.symbol,
            asset.name,
            shorten(&asset.token_address, 6, 4),
            asset.decimals
        ));

        if entry.is_loading {
            out.push_str("    Loading markets...\n");
        } else if let Some(err) = &entry.error {
            out.push_str(&format!("    Error: {}\n", err));
        } else if entry.markets.is_empty() {
            out.push_str("    No markets\n");
        }

        for market in &entry.markets.markets {
            render_market(&mut out, market);
        }
    }

    if !view.errors.is_empty() {
        out.push_str(&format!("{} asset(s) failed to load markets\n", view.errors.len()));
    }

    out
}
