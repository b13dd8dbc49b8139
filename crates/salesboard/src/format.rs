//! Number formatting for cards and chart labels.
//!
//! All amounts use a comma thousands separator and two decimals, matching
//! `{:,.2f}`; currency amounts carry the `Rs.` prefix.

use num_format::{Locale, ToFormattedString};

/// Currency prefix shown before monetary amounts.
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Format `value` with thousands separators and two decimals.
///
/// ```
/// assert_eq!(salesboard::format::grouped(1234.567), "1,234.57");
/// assert_eq!(salesboard::format::grouped(-0.004), "0.00");
/// ```
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let whole = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{sign}{whole}.{frac_part}")
}

/// Format a monetary amount, e.g. `Rs. 1,234,567.89`.
pub fn currency(value: f64) -> String {
    format!("{CURRENCY_PREFIX} {}", grouped(value))
}

/// Format a count with thousands separators.
pub fn count(value: usize) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Format a share in `[0, 1]` as a percentage with one decimal.
pub fn percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}
