use super::modal::{AmountForm, PendingSubmission};
use crate::models::{Asset, MarketData, TokenBalance};
use crate::utils::{format_apy, shorten};

/// Amount entry for supplying an asset to a market
#[derive(Debug, Default)]
pub struct SupplyModal {
    form: AmountForm,
    balance: Option<TokenBalance>,
}

impl SupplyModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the modal for `asset`; switching assets clears the entry
    pub fn open(&mut self, asset: Asset, market: MarketData) {
        let switching = self
            .form
            .target()
            .map(|(current, _)| current.token_address != asset.token_address)
            .unwrap_or(true);
        if switching {
            self.balance = None;
        }
        self.form.open(asset, market);
    }

    /// Close unless a submission is in flight
    pub fn close(&mut self) -> bool {
        let closed = self.form.close();
        if closed {
            self.balance = None;
        }
        closed
    }

    pub fn is_open(&self) -> bool {
        self.form.target().is_some()
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.form.set_amount(amount);
    }

    pub fn set_balance(&mut self, balance: Option<TokenBalance>) {
        self.balance = balance;
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
        self.form.begin(user_address, None)
    }

    pub fn finish_submit(&mut self, success: bool) {
        self.form.finish(success);
        if success {
            self.balance = None;
        }
    }

    pub fn render(&self) -> String {
        let Some((asset, market)) = self.form.target() else {
            return String::new();
        };

        let mut out = String::new();
        out.push_str(&format!("Supply {}\n", asset.symbol));
        if let Some(balance) = &self.balance {
            out.push_str(&format!("  Wallet balance: {}\n", balance.formatted_amount(&asset.symbol)));
        }
        out.push_str(&format!("  Amount: {} {}\n", self.form.amount(), asset.symbol));
        if let Some(error) = self.form.error() {
            out.push_str(&format!("  ! {}\n", error));
        }
        out.push_str(&format!("  Token Address: {}\n", shorten(&asset.token_address, 6, 4)));
        out.push_str(&format!("  Decimals: {}\n", asset.decimals));
        out.push_str(&format!("  Reserve: {}\n", shorten(&market.reserve_object, 6, 4)));
        out.push_str(&format!("  Supply APY: {}\n", format_apy(market.supply_apy)));
        out.push_str(&format!(
            "  [Cancel] [{}]\n",
            if self.form.is_submitting() { "Supplying..." } else { "Supply" }
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transaction::testing::{usdc, usdc_market};
    use crate::views::modal::{INVALID_AMOUNT, WALLET_REQUIRED};

    #[test]
    fn invalid_amount_stays_inline() {
        let mut modal = SupplyModal::new();
        modal.open(usdc(), usdc_market());

        for amount in ["", "0", "-1", "abc"] {
            modal.set_amount(amount);
            assert!(modal.begin_submit(Some("0xuser")).is_none());
            assert_eq!(modal.error(), Some(INVALID_AMOUNT));
            assert!(!modal.is_submitting());
        }
    }

    #[test]
    fn wallet_is_required() {
        let mut modal = SupplyModal::new();
        modal.open(usdc(), usdc_market());
        modal.set_amount("1");
        assert!(modal.begin_submit(None).is_none());
        assert_eq!(modal.error(), Some(WALLET_REQUIRED));
    }

    #[test]
    fn submitting_locks_the_modal() {
        let mut modal = SupplyModal::new();
        modal.open(usdc(), usdc_market());
        modal.set_amount(" 2.5 ");

        let pending = modal.begin_submit(Some("0xuser")).unwrap();
        assert_eq!(pending.amount, "2.5");
        assert_eq!(pending.params().user_address, "0xuser");
        assert!(modal.is_submitting());
        assert!(modal.render().contains("[Supplying...]"));

        assert!(modal.begin_submit(Some("0xuser")).is_none());
        assert!(!modal.close());
        modal.set_amount("99");
        assert_eq!(modal.amount(), " 2.5 ");

        modal.finish_submit(false);
        assert!(modal.is_open());
        modal.finish_submit(true);
        assert!(!modal.is_open());
        assert_eq!(modal.amount(), "");
    }

    #[test]
    fn switching_assets_resets_entry() {
        let mut modal = SupplyModal::new();
        modal.open(usdc(), usdc_market());
        modal.set_amount("3");
        modal.open(usdc(), usdc_market());
        assert_eq!(modal.amount(), "3");

        modal.open(Asset::new("0xapt", "Aptos", "APT", 8), usdc_market());
        assert_eq!(modal.amount(), "");
        assert!(modal.render().starts_with("Supply APT"));
    }
}
