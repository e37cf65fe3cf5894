use rust_decimal::Decimal;

use crate::models::token::from_base_units;

/// Health factors are wad-scaled (1e18 == 1.0)
const WAD_DIGITS: u8 = 18;

/// A health factor of 1e18 or more (37+ raw digits) reads as "no debt"
const INFINITE_HEALTH_FACTOR_DIGITS: usize = 37;

/// Truncate a string to a maximum length
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Keep the first `head` and last `tail` characters: `0x1234...abcd`
pub fn shorten(s: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= head + tail {
        return s.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}

/// Format an account address for display (truncated)
pub fn format_address(address: &str) -> String {
    shorten(address, 6, 4)
}

/// Fixed-point rendering with exactly `dp` decimal places, truncated
pub fn format_amount(value: Decimal, dp: u32) -> String {
    let mut v = value.trunc_with_scale(dp);
    v.rescale(dp);
    v.to_string()
}

/// APYs arrive as percentages
pub fn format_apy(apy: f64) -> String {
    format!("{:.2}%", apy)
}

/// Render a basis-point string such as LTV `8000` as `80.00%`
pub fn format_bps(bps: &str) -> String {
    match bps.trim().parse::<Decimal>() {
        Ok(v) => format!("{}%", format_amount(v / Decimal::from(100), 2)),
        Err(_) => "-".to_string(),
    }
}

/// Render a wad-scaled health factor; huge values mean no borrow at all
pub fn format_health_factor(raw: &str) -> String {
    let digits = raw.trim().trim_start_matches('0');
    if !digits.is_empty() && !digits.chars().all(|c| c.is_ascii_digit()) {
        return "-".to_string();
    }
    if raw.trim().is_empty() {
        return "-".to_string();
    }
    if digits.len() >= INFINITE_HEALTH_FACTOR_DIGITS {
        return "∞".to_string();
    }

    // Keep two of the wad's decimals so large factors still fit a Decimal.
    let dropped = WAD_DIGITS as usize - 2;
    let cents = match digits.len().checked_sub(dropped) {
        Some(kept) if kept > 0 => digits[..kept].parse::<i128>().unwrap_or_default(),
        _ => 0,
    };
    format_amount(Decimal::from_i128_with_scale(cents, 2), 2)
}

/// Base-currency amounts are integers with 8 implied decimals
pub fn format_base_currency(raw: &str) -> String {
    match from_base_units(raw.trim(), 8) {
        Some(v) => format!("${}", format_amount(v, 2)),
        None => "-".to_string(),
    }
}
