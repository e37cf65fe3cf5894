//! Entry-function payloads of the lending module

use serde_json::{json, Value};

use crate::models::EntryFunctionPayload;

/// Address the lending module is published under
pub const MODULE_ADDRESS: &str =
    "0x39ddcd9e1a39fa14f25e3f9ec8a86074d05cc0881cbf667df8a6ee70942016fb";

pub const SUPPLY_LOGIC_MODULE: &str = "supply_logic";

/// Referral code sent with every supply (u16 on chain)
pub const REFERRAL_CODE: u16 = 0;

fn function_name(entry: &str) -> String {
    format!("{}::{}::{}", MODULE_ADDRESS, SUPPLY_LOGIC_MODULE, entry)
}

/// `supply(asset, amount, on_behalf_of, referral_code)`
pub fn supply_payload(asset_address: &str, amount: u128, on_behalf_of: &str) -> EntryFunctionPayload {
    EntryFunctionPayload::new(
        function_name("supply"),
        vec![
            Value::String(asset_address.to_string()),
            Value::String(amount.to_string()),
            Value::String(on_behalf_of.to_string()),
            json!(REFERRAL_CODE),
        ],
    )
}

/// `withdraw(asset, amount, to)`
pub fn withdraw_payload(asset_address: &str, amount: u128, to: &str) -> EntryFunctionPayload {
    EntryFunctionPayload::new(
        function_name("withdraw"),
        vec![
            Value::String(asset_address.to_string()),
            Value::String(amount.to_string()),
            Value::String(to.to_string()),
        ],
    )
}
