//! Display formatting helpers

use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Currency rendering options
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Format a digit string with thousands separators
pub fn format_number(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount as currency, e.g. `₹1,234.50`
pub fn format_currency(amount: Decimal, format: &CurrencyFormat) -> String {
    let mut value = amount.abs().round_dp(format.decimal_places);
    value.rescale(format.decimal_places);
    let text = value.to_string();

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let sign = if amount.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    let mut out = format!(
        "{}{}{}",
        sign,
        format.symbol,
        format_number(integer, &format.thousands_separator)
    );
    if let Some(fraction) = fraction {
        out.push_str(&format.decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// Format a date with a chrono format string, e.g. `Mar 1, 2024`.
///
/// A pattern chrono cannot render falls back to `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Truncate text to `max` characters, appending an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
