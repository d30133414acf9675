use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

/// All monetary values carry exactly two fractional digits.
pub const AMOUNT_SCALE: u32 = 2;

/// Normalizes a raw decimal to the ledger's fixed scale, rounding half-up.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a user-supplied amount string into a positive scale-2 decimal.
///
/// Rounding happens before the positivity check, so `"0.004"` rounds to
/// `0.00` and is rejected the same way `"0"` is.
pub fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("amount is empty".into()));
    }
    let value = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::InvalidAmount(format!("`{trimmed}` is not a number")))?;
    let value = normalize(value);
    if value <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(
            "amount must be positive".into(),
        ));
    }
    Ok(value)
}

/// Digit grouping styles for the integer part of an amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// Groups of three: 1,234,567.
    Thousands,
    /// Indian grouping, three then twos: 12,34,567.
    Lakh,
}

/// Display preferences for rendering amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub code: String,
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
}

impl CurrencyFormat {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into().to_uppercase();
        let symbol = symbol_for(&code);
        let grouping = if code == "INR" {
            GroupingStyle::Lakh
        } else {
            GroupingStyle::Thousands
        };
        Self {
            code,
            symbol,
            decimal_separator: '.',
            grouping_separator: ',',
            grouping,
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("INR")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

/// Renders an amount with symbol, separators, and grouping, e.g. `₹1,23,456.78`.
pub fn format_amount(value: Decimal, format: &CurrencyFormat) -> String {
    let normalized = normalize(value);
    let negative = normalized < Decimal::ZERO;
    let body = format!("{:.2}", normalized.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (body, "00".to_string()),
    };
    let grouped = group_digits(&int_part, format.grouping_separator, format.grouping);
    let sign = if negative { "-" } else { "" };
    format!(
        "{sign}{}{grouped}{}{frac_part}",
        format.symbol, format.decimal_separator
    )
}

fn group_digits(digits: &str, separator: char, style: GroupingStyle) -> String {
    let mut grouped = String::new();
    let mut count = 0usize;
    for ch in digits.chars().rev() {
        let boundary = match style {
            GroupingStyle::Thousands => count != 0 && count % 3 == 0,
            // First break after three digits, then every two.
            GroupingStyle::Lakh => count != 0 && (count == 3 || (count > 3 && (count - 3) % 2 == 0)),
        };
        if boundary {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_and_rounds_half_up() {
        assert_eq!(parse_amount("500.00").unwrap(), dec!(500.00));
        assert_eq!(parse_amount("12.345").unwrap(), dec!(12.35));
        assert_eq!(parse_amount("  42 ").unwrap(), dec!(42.00));
    }

    #[test]
    fn rejects_non_numeric_and_non_positive() {
        for raw in ["abc", "", "   ", "-10", "0", "0.004", "10.0.0"] {
            let err = parse_amount(raw).expect_err(raw);
            assert!(matches!(err, LedgerError::InvalidAmount(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn formats_inr_with_lakh_grouping() {
        let format = CurrencyFormat::default();
        assert_eq!(format_amount(dec!(1234567.89), &format), "₹12,34,567.89");
        assert_eq!(format_amount(dec!(123456.78), &format), "₹1,23,456.78");
        assert_eq!(format_amount(dec!(500), &format), "₹500.00");
        assert_eq!(format_amount(dec!(-1234.5), &format), "-₹1,234.50");
    }

    #[test]
    fn formats_thousands_grouping() {
        let format = CurrencyFormat::new("USD");
        assert_eq!(format_amount(dec!(1234567.89), &format), "$1,234,567.89");
        assert_eq!(format_amount(dec!(0), &format), "$0.00");
    }
}
