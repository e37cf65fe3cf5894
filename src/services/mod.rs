//! Supply and withdraw transaction services

pub mod amount;
pub mod payload;
pub mod supply;
pub mod transaction;
pub mod withdraw;

// Re-export for convenience
pub use amount::{parse_amount, to_base_units};
pub use payload::MODULE_ADDRESS;
pub use supply::execute_supply;
pub use transaction::TransactionParams;
pub use withdraw::execute_withdraw;
