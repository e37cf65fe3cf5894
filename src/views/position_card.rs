use rust_decimal::Decimal;

use crate::models::UserAssetData;
use crate::utils::{format_amount, shorten};

/// One asset position inside a protocol section
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCard {
    pub asset: String,
    pub token_address: String,
    pub supplied: Decimal,
    pub borrowed: Decimal,
    pub collateral: bool,
}

impl PositionCard {
    /// Build a card; `None` when the position holds nothing
    pub fn new(data: &UserAssetData, decimals: u8) -> Option<Self> {
        let supplied = data.supplied(decimals);
        let borrowed = data.borrowed(decimals);
        if supplied.is_zero() && borrowed.is_zero() {
            return None;
        }

        Some(Self {
            asset: data.asset.clone(),
            token_address: data.token_address.clone(),
            supplied,
            borrowed,
            collateral: data.uses_as_collateral(),
        })
    }

    pub fn net(&self) -> Decimal {
        self.supplied - self.borrowed
    }

    pub fn can_withdraw(&self) -> bool {
        self.supplied > Decimal::ZERO
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {}{}\n",
            self.asset,
            shorten(&self.token_address, 10, 8),
            if self.collateral { "  (collateral)" } else { "" }
        ));
        out.push_str(&format!("  Supplied: ${}\n", format_amount(self.supplied, 4)));
        out.push_str(&format!("  Borrowed: ${}\n", format_amount(self.borrowed, 4)));
        out.push_str(&format!("  Net: ${}\n", format_amount(self.net(), 4)));
        out.push_str(&format!(
            "  [Withdraw]{}\n",
            if self.can_withdraw() { "" } else { " (disabled)" }
        ));
        out
    }
}
