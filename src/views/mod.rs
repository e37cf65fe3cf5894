//! Text views over the dashboard state

pub mod asset_list;
pub mod header;
pub mod modal;
pub mod portfolio_panel;
pub mod position_card;
pub mod supply_modal;
pub mod withdraw_modal;

// Re-export for convenience
pub use header::{Header, WalletSelection};
pub use modal::PendingSubmission;
pub use portfolio_panel::{PortfolioPanel, ProtocolSection};
pub use position_card::PositionCard;
pub use supply_modal::SupplyModal;
pub use withdraw_modal::WithdrawModal;
