use rust_decimal::Decimal;

/// Largest scale `Decimal` can carry
pub const MAX_DECIMALS: u8 = 28;

/// Convert an integer base-unit string into a human amount using `decimals`.
///
/// Returns `None` when the string is not a non-negative integer or does not fit.
pub fn from_base_units(raw: &str, decimals: u8) -> Option<Decimal> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let value: u128 = raw.trim().parse().ok()?;
    let value = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(value, decimals as u32)
        .ok()
        .map(|d| d.normalize())
}

/// Wallet balance of one asset type
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub raw: u128,
    pub formatted: Decimal,
    pub decimals: u8,
}

impl TokenBalance {
    /// Create a new token balance from base units
    pub fn new(raw: u128, decimals: u8) -> Self {
        let formatted = from_base_units(&raw.to_string(), decimals).unwrap_or(Decimal::ZERO);

        Self {
            raw,
            formatted,
            decimals,
        }
    }

    /// Balance reported for accounts that never held the asset
    pub fn zero(decimals: u8) -> Self {
        Self::new(0, decimals)
    }

    /// Format token amount with symbol
    pub fn formatted_amount(&self, symbol: &str) -> String {
        format!("{} {}", self.formatted, symbol)
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn converts_base_units_with_declared_decimals() {
        assert_eq!(from_base_units("10000000", 6), Some(Decimal::from(10)));
        assert_eq!(
            from_base_units("1500001", 6),
            Some(Decimal::from_str("1.500001").unwrap())
        );
        assert_eq!(from_base_units("0", 8), Some(Decimal::ZERO));
    }

    #[test]
    fn rejects_garbage_and_oversized_scale() {
        assert_eq!(from_base_units("-5", 6), None);
        assert_eq!(from_base_units("1.5", 6), None);
        assert_eq!(from_base_units("12", 29), None);
    }

    #[test]
    fn token_balance_formats_with_symbol() {
        let balance = TokenBalance::new(2_500_000, 6);
        assert_eq!(balance.formatted_amount("USDC"), "2.5 USDC");
        assert!(!balance.is_zero());
        assert!(TokenBalance::zero(6).is_zero());
    }
}
