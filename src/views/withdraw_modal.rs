use rust_decimal::Decimal;

use super::modal::{AmountForm, PendingSubmission};
use crate::models::{Asset, MarketData};
use crate::utils::{format_amount, shorten};

pub const INSUFFICIENT_SUPPLIED: &str = "Insufficient supplied balance";

/// At least two decimal places, at most the asset's own
fn format_available(value: Decimal, decimals: u8) -> String {
    let mut v = value.trunc_with_scale(decimals as u32).normalize();
    if v.scale() < 2 {
        v.rescale(2);
    }
    v.to_string()
}

/// Amount entry for withdrawing a supplied position
#[derive(Debug, Default)]
pub struct WithdrawModal {
    form: AmountForm,
    supplied: Decimal,
}

impl WithdrawModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the modal for a position holding `supplied` units of `asset`
    pub fn open(&mut self, asset: Asset, market: MarketData, supplied: Decimal) {
        self.form.open(asset, market);
        self.supplied = supplied;
    }

    /// Close unless a submission is in flight
    pub fn close(&mut self) -> bool {
        let closed = self.form.close();
        if closed {
            self.supplied = Decimal::ZERO;
        }
        closed
    }

    pub fn is_open(&self) -> bool {
        self.form.target().is_some()
    }

    pub fn supplied(&self) -> Decimal {
        self.supplied
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.form.set_amount(amount);
    }

    /// Fill in the whole supplied balance
    pub fn max(&mut self) {
        if self.form.is_submitting() || self.supplied <= Decimal::ZERO {
            return;
        }
        self.form.set_amount(&self.supplied.normalize().to_string());
        self.form.clear_error();
    }

    pub fn amount(&self) -> &str {
        self.form.amount()
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    pub fn begin_submit(&mut self, user_address: Option<&str>) -> Option<PendingSubmission> {
        self.form
            .begin(user_address, Some((self.supplied, INSUFFICIENT_SUPPLIED)))
    }

    pub fn finish_submit(&mut self, success: bool) {
        self.form.finish(success);
        if !self.is_open() {
            self.supplied = Decimal::ZERO;
        }
    }

    pub fn render(&self) -> String {
        let Some((asset, market)) = self.form.target() else {
            return String::new();
        };

        let mut out = String::new();
        out.push_str(&format!("Withdraw {}\n", asset.symbol));
        out.push_str(&format!("  Net Balance: ${}\n", format_amount(self.supplied, 4)));
        out.push_str(&format!(
            "  Available: {} {}\n",
            format_available(self.supplied, asset.decimals),
            asset.symbol
        ));
        out.push_str(&format!(
            "  Amount: {} {}  [MAX]{}\n",
            self.form.amount(),
            asset.symbol,
            if self.supplied.is_zero() { " (disabled)" } else { "" }
        ));
        if let Some(error) = self.form.error() {
            out.push_str(&format!("  ! {}\n", error));
        }
        out.push_str(&format!("  Token Address: {}\n", shorten(&asset.token_address, 6, 4)));
        out.push_str(&format!("  Decimals: {}\n", asset.decimals));
        out.push_str(&format!("  Reserve: {}\n", shorten(&market.reserve_object, 6, 4)));
        out.push_str(&format!(
            "  [Cancel] [{}]\n",
            if self.form.is_submitting() { "Withdrawing..." } else { "Withdraw" }
        ));
        out
    }
}
