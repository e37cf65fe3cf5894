//! Conversion of user-entered amounts into on-chain base units

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::errors::TransactionError;
use crate::models::token::MAX_DECIMALS;

/// Parse a user-entered amount; it must be a positive number
pub fn parse_amount(amount: &str) -> Result<Decimal, TransactionError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(TransactionError::InvalidAmount("amount is empty".into()));
    }

    let value = Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .map_err(|_| TransactionError::InvalidAmount(format!("'{}' is not a number", amount)))?;

    if value <= Decimal::ZERO {
        return Err(TransactionError::InvalidAmount(format!(
            "'{}' is not positive",
            amount
        )));
    }
    Ok(value)
}

/// Largest exponent accepted in scientific input
const MAX_EXPONENT: i64 = 96;

/// Rewrite `1.5e-3` as `0.0015` so truncation sees every digit the user typed
fn expand_scientific(amount: &str) -> Result<Cow<'_, str>, TransactionError> {
    let Some((mantissa, exponent)) = amount.split_once(|c: char| c == 'e' || c == 'E') else {
        return Ok(Cow::Borrowed(amount));
    };
    let not_a_number = || TransactionError::InvalidAmount(format!("'{}' is not a number", amount));

    let exponent: i64 = exponent.parse().map_err(|_| not_a_number())?;
    if exponent.abs() > MAX_EXPONENT {
        return Err(TransactionError::InvalidAmount(format!(
            "'{}' is out of range",
            amount
        )));
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{}{}", whole, fraction);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_a_number());
    }

    let point = whole.len() as i64 + exponent;
    let plain = if point <= 0 {
        format!("{}0.{}{}", sign, "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}{}", sign, digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}{}.{}", sign, int, frac)
    };
    Ok(Cow::Owned(plain))
}

/// Drop fraction digits beyond `decimals` so parsing can never round up
fn truncate_fraction(amount: &str, decimals: u8) -> Cow<'_, str> {
    let plain = amount.chars().all(|c| c.is_ascii_digit() || c == '.')
        && amount.matches('.').count() == 1;

    match amount.split_once('.') {
        Some((whole, fraction)) if plain && fraction.len() > decimals as usize => {
            let kept = &fraction[..decimals as usize];
            if kept.is_empty() {
                Cow::Owned(whole.to_string())
            } else {
                Cow::Owned(format!("{}.{}", whole, kept))
            }
        }
        _ => Cow::Borrowed(amount),
    }
}

/// Scale `amount` to integer base units: `floor(amount * 10^decimals)`.
///
/// Truncates, never rounds, so the submitted quantity never exceeds what the
/// user typed.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<u128, TransactionError> {
    if decimals > MAX_DECIMALS {
        return Err(TransactionError::InvalidAmount(format!(
            "unsupported decimals {}",
            decimals
        )));
    }

    let amount = amount.trim();
    let expanded = expand_scientific(amount)?;
    let value = parse_amount(&truncate_fraction(&expanded, decimals))?;

    let multiplier = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
    let scaled = value
        .checked_mul(multiplier)
        .ok_or_else(|| TransactionError::InvalidAmount(format!("'{}' is too large", amount)))?
        .trunc()
        .to_u128()
        .ok_or_else(|| TransactionError::InvalidAmount(format!("'{}' is out of range", amount)))?;

    if scaled == 0 {
        return Err(TransactionError::InvalidAmount(format!(
            "'{}' is smaller than one base unit",
            amount
        )));
    }
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_declared_decimals() {
        assert_eq!(to_base_units("1.5", 6).unwrap(), 1_500_000);
        assert_eq!(to_base_units("10", 6).unwrap(), 10_000_000);
        assert_eq!(to_base_units("0.00000001", 8).unwrap(), 1);
        assert_eq!(to_base_units(" 2 ", 0).unwrap(), 2);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(to_base_units("1.9999999", 6).unwrap(), 1_999_999);
        assert_eq!(to_base_units("0.29", 2).unwrap(), 29);
        assert_eq!(
            to_base_units("1.999999999999999999999999999999999", 6).unwrap(),
            1_999_999
        );
        assert_eq!(to_base_units("5.9", 0).unwrap(), 5);
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(to_base_units("1e2", 6).unwrap(), 100_000_000);
        assert_eq!(to_base_units("2.5e-3", 6).unwrap(), 2_500);
        assert_eq!(to_base_units("15E+1", 2).unwrap(), 15_000);
        assert_eq!(to_base_units(".5e1", 1).unwrap(), 50);
    }

    #[test]
    fn scientific_input_truncates_instead_of_rounding() {
        assert_eq!(
            to_base_units("1.99999999999999999999999999999999e0", 6).unwrap(),
            1_999_999
        );
        assert_eq!(
            to_base_units("199999999999999999999999999999999e-32", 6).unwrap(),
            1_999_999
        );
        assert_eq!(to_base_units("1.9999999e2", 4).unwrap(), 1_999_999);
    }

    #[test]
    fn rejects_malformed_scientific_input() {
        for bad in ["1e", "e5", "1e1.5", "-2e1", "1e999", "1.2.3e1"] {
            assert!(
                matches!(to_base_units(bad, 6), Err(TransactionError::InvalidAmount(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_invalid_amounts() {
        for bad in ["", "   ", "abc", "-1", "0", "0.0", "1.2.3"] {
            assert!(
                matches!(to_base_units(bad, 1), Err(TransactionError::InvalidAmount(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn rejects_dust_below_one_unit() {
        assert!(matches!(
            to_base_units("0.0000001", 6),
            Err(TransactionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn round_trips_with_display_conversion() {
        let scaled = to_base_units("10", 6).unwrap();
        let shown = crate::models::token::from_base_units(&scaled.to_string(), 6).unwrap();
        assert_eq!(to_base_units(&shown.to_string(), 6).unwrap(), scaled);
    }
}
