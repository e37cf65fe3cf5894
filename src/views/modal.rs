use rust_decimal::Decimal;

use crate::models::{Asset, MarketData};
use crate::services::{parse_amount, TransactionParams};

pub const INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const WALLET_REQUIRED: &str = "Please connect your wallet first";

/// A validated request, detached from the modal while it is in flight
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub asset: Asset,
    pub market: MarketData,
    pub amount: String,
    pub user_address: String,
}

impl PendingSubmission {
    pub fn params(&self) -> TransactionParams<'_> {
        TransactionParams {
            asset: &self.asset,
            market: &self.market,
            amount: &self.amount,
            user_address: &self.user_address,
        }
    }
}

/// Amount entry shared by the supply and withdraw modals
#[derive(Debug, Default)]
pub(crate) struct AmountForm {
    target: Option<(Asset, MarketData)>,
    amount: String,
    error: Option<String>,
    submitting: bool,
}

impl AmountForm {
    pub fn open(&mut self, asset: Asset, market: MarketData) {
        let same_asset = self
            .target
            .as_ref()
            .map(|(current, _)| current.token_address == asset.token_address)
            .unwrap_or(false);
        if !same_asset {
            self.reset();
        }
        self.target = Some((asset, market));
    }

    pub fn close(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.reset();
        self.target = None;
        true
    }

    fn reset(&mut self) {
        self.amount.clear();
        self.error = None;
    }

    pub fn target(&self) -> Option<&(Asset, MarketData)> {
        self.target.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_amount(&mut self, amount: &str) {
        if !self.submitting {
            self.amount = amount.to_string();
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validate and lock the form; `ceiling` bounds the amount when set
    pub fn begin(
        &mut self,
        user_address: Option<&str>,
        ceiling: Option<(Decimal, &str)>,
    ) -> Option<PendingSubmission> {
        if self.submitting {
            return None;
        }
        let (asset, market) = self.target.clone()?;
        self.error = None;

        let amount = match parse_amount(&self.amount) {
            Ok(amount) => amount,
            Err(_) => {
                self.error = Some(INVALID_AMOUNT.to_string());
                return None;
            }
        };
        if let Some((limit, message)) = ceiling {
            if amount > limit {
                self.error = Some(message.to_string());
                return None;
            }
        }
        let Some(user_address) = user_address else {
            self.error = Some(WALLET_REQUIRED.to_string());
            return None;
        };

        self.submitting = true;
        Some(PendingSubmission {
            asset,
            market,
            amount: self.amount.trim().to_string(),
            user_address: user_address.to_string(),
        })
    }

    /// Unlock after settlement; a success closes the form
    pub fn finish(&mut self, success: bool) {
        self.submitting = false;
        if success {
            self.close();
        }
    }
}
