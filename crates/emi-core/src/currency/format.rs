use rust_decimal::{Decimal, RoundingStrategy};

use super::rates::DisplayCurrency;
use crate::types::{Currency, Money};

/// Digit grouping of the integer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567
    Western,
    /// 12,34,567 (last three digits, then pairs)
    Indian,
}

/// Convert `amount` for display and format it with the currency's symbol.
pub fn format_amount(amount: Money, display: &DisplayCurrency) -> String {
    format_in_currency(display.convert(amount), &display.currency)
}

/// Format an already converted amount.
///
/// The base currency is shown in whole units with Indian grouping; every other
/// currency keeps up to two decimals (trailing zeros dropped) with Western grouping.
pub fn format_in_currency(amount: Money, currency: &Currency) -> String {
    let (rounded, grouping) = if currency.is_base() {
        (
            amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            Grouping::Indian,
        )
    } else {
        (
            amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
            Grouping::Western,
        )
    };

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = format!("{sign}{}{}", currency.symbol(), group_digits(int_part, grouping));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Insert thousands separators into a string of ASCII digits.
pub fn group_digits(digits: &str, grouping: Grouping) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let step = match grouping {
        Grouping::Western => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}

/// Percentage with one decimal place, e.g. `49.7%`.
pub fn format_percent(pct: Decimal) -> String {
    format!("{}%", pct.round_dp(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::rates::ExchangeRate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(group_digits("1000000", Grouping::Indian), "10,00,000");
        assert_eq!(group_digits("12345678", Grouping::Indian), "1,23,45,678");
        assert_eq!(group_digits("11054", Grouping::Indian), "11,054");
        assert_eq!(group_digits("999", Grouping::Indian), "999");
    }

    #[test]
    fn test_western_grouping() {
        assert_eq!(group_digits("1234567", Grouping::Western), "1,234,567");
        assert_eq!(group_digits("1000", Grouping::Western), "1,000");
        assert_eq!(group_digits("12", Grouping::Western), "12");
    }

    #[test]
    fn test_base_currency_rounds_to_whole_units() {
        assert_eq!(format_in_currency(dec!(11053.989), &Currency::INR), "₹11,054");
        assert_eq!(format_in_currency(dec!(1989718.06), &Currency::INR), "₹19,89,718");
        assert_eq!(format_in_currency(dec!(0.4), &Currency::INR), "₹0");
    }

    #[test]
    fn test_foreign_currency_keeps_two_decimals() {
        assert_eq!(format_in_currency(dec!(8333.333), &Currency::USD), "$8,333.33");
        assert_eq!(format_in_currency(dec!(8333.3), &Currency::EUR), "€8,333.3");
        assert_eq!(format_in_currency(dec!(12500.00), &Currency::GBP), "£12,500");
        assert_eq!(format_in_currency(dec!(0.005), &Currency::USD), "$0.01");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_in_currency(dec!(-1234.5), &Currency::USD), "-$1,234.5");
        assert_eq!(format_in_currency(dec!(-0.2), &Currency::INR), "₹0");
    }

    #[test]
    fn test_format_amount_converts_first() {
        let display = DisplayCurrency::new(Currency::USD, Some(ExchangeRate::new(dec!(80)).unwrap()));
        assert_eq!(format_amount(dec!(1_000_000), &display), "$12,500");
        assert_eq!(format_amount(dec!(1_000_000), &DisplayCurrency::base()), "₹10,00,000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(49.74)), "49.7%");
    }
}
