use emi_core::currency::{format_amount, DisplayCurrency, RateTable};
use emi_core::loan::{analyze_loan, LoanTerms};
use emi_core::{Currency, EmiError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn sample_table() -> RateTable {
    let rates: HashMap<String, Decimal> = [
        ("INR", dec!(1)),
        ("USD", dec!(0.0125)),
        ("EUR", dec!(0.0100)),
        ("GBP", dec!(0.0080)),
        ("JPY", dec!(1.60)),
    ]
    .into_iter()
    .map(|(code, rate)| (code.to_string(), rate))
    .collect();
    RateTable::new(Currency::INR, rates)
}

#[test]
fn test_conversion_happens_after_computation() {
    let terms = LoanTerms::new(dec!(1_000_000), dec!(10.5), 15);
    let analysis = analyze_loan(&terms).unwrap().result;

    let inr = analysis.in_currency(&DisplayCurrency::base());
    let usd = analysis.in_currency(&DisplayCurrency::from_table(&sample_table(), Currency::USD).unwrap());

    // Same schedule shape, amounts scaled by 1/80 and rounded to cents.
    assert_eq!(inr.schedule.len(), usd.schedule.len());
    assert!((usd.summary.monthly_payment * dec!(80) - inr.summary.monthly_payment).abs() < dec!(0.0000001));
    assert_eq!(usd.schedule[0].interest, dec!(109.38));
}

#[test]
fn test_formatted_summary_per_currency() {
    let analysis = analyze_loan(&LoanTerms::new(dec!(1_000_000), dec!(10.5), 15)).unwrap().result;

    let inr = analysis.in_currency(&DisplayCurrency::base());
    assert_eq!(inr.formatted.monthly_payment, "₹11,054");
    assert_eq!(inr.formatted.total_payment, "₹19,89,718");

    let gbp = DisplayCurrency::from_table(&sample_table(), Currency::GBP).unwrap();
    assert_eq!(format_amount(dec!(1_000_000), &gbp), "£8,000");

    let jpy = DisplayCurrency::from_table(&sample_table(), Currency::JPY).unwrap();
    assert_eq!(format_amount(dec!(1_000_000), &jpy), "¥1,600,000");
}

#[test]
fn test_unavailable_rate_falls_back_to_base() {
    let table = sample_table();
    let display = match DisplayCurrency::from_table(&table, Currency::AUD) {
        Ok(d) => d,
        Err(EmiError::RateUnavailable(_)) => DisplayCurrency::base(),
        Err(e) => panic!("unexpected error: {e}"),
    };
    assert!(display.is_base());
    assert_eq!(format_amount(dec!(250_000), &display), "₹2,50,000");
}

#[test]
fn test_rate_table_roundtrips_json() {
    let table = sample_table();
    let json = serde_json::to_string(&table).unwrap();
    let back: RateTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
}
