//! Cached, retrying data access for the views

pub mod cache;
pub mod hooks;
pub mod policy;

// Re-export for convenience
pub use cache::{QueryCache, QueryResult};
pub use hooks::{AssetWithMarkets, AssetsWithMarkets, Hooks, TokenBalanceKey};
pub use policy::QueryPolicy;
