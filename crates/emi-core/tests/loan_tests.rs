use emi_core::loan::engine::BALANCE_EPSILON;
use emi_core::loan::{analyze_loan, build_schedule, compute_summary, LoanSummary, LoanTerms};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Known-answer scenarios
// ===========================================================================

#[test]
fn test_reference_loan_fifteen_years() {
    let summary = compute_summary(dec!(1_000_000), dec!(10.5), 15);
    assert_eq!(summary.monthly_payment.trunc(), dec!(11053));
    assert!(
        (summary.monthly_payment - dec!(11054)).abs() < Decimal::ONE,
        "EMI {} should be ~11,054",
        summary.monthly_payment
    );

    let rows = build_schedule(dec!(1_000_000), dec!(10.5), 15, summary.monthly_payment);
    assert_eq!(rows.len(), 180);
    assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
    assert_eq!(rows[0].interest, dec!(8750));
}

#[test]
fn test_zero_rate_five_years() {
    let summary = compute_summary(dec!(500_000), Decimal::ZERO, 5);
    assert_eq!(summary.monthly_payment.round_dp(2), dec!(8333.33));
    assert!(summary.total_interest.abs() < dec!(0.000001));
    assert!((summary.total_payment - dec!(500_000)).abs() < dec!(0.000001));

    let rows = build_schedule(dec!(500_000), Decimal::ZERO, 5, summary.monthly_payment);
    assert_eq!(rows.len(), 60);
    assert!(rows.iter().all(|r| r.interest.is_zero()));
    assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_one_year_final_payment_is_balance_plus_interest() {
    let summary = compute_summary(dec!(100_000), dec!(8), 1);
    assert!((summary.monthly_payment - dec!(8698.84)).abs() < dec!(0.01));

    let rows = build_schedule(dec!(100_000), dec!(8), 1, summary.monthly_payment);
    assert_eq!(rows.len(), 12);

    let before_last = &rows[10];
    let last = &rows[11];
    assert_eq!(last.principal, before_last.balance);
    assert_eq!(last.payment, before_last.balance + last.interest);
    assert_eq!(last.balance, Decimal::ZERO);
    // Every earlier month pays the scheduled instalment.
    assert!(rows[..11]
        .iter()
        .all(|r| r.payment == summary.monthly_payment));
}

#[test]
fn test_terms_methods_match_free_functions() {
    let terms = LoanTerms::new(dec!(2_500_000), dec!(7.25), 20);
    let summary = terms.summary();
    assert_eq!(summary, compute_summary(dec!(2_500_000), dec!(7.25), 20));
    assert_eq!(
        terms.schedule(summary.monthly_payment),
        build_schedule(dec!(2_500_000), dec!(7.25), 20, summary.monthly_payment)
    );
}

#[test]
fn test_degenerate_inputs_never_fail() {
    let cases = [
        (Decimal::ZERO, dec!(10), 10u32),
        (dec!(-100_000), dec!(10), 10),
        (dec!(100_000), dec!(10), 0),
        (dec!(100_000), Decimal::ZERO, 0),
        (Decimal::MAX, dec!(20), 30),
        (dec!(100_000), dec!(1_000_000), 30),
    ];
    for (principal, rate, years) in cases {
        let summary = compute_summary(principal, rate, years);
        let rows = build_schedule(principal, rate, years, summary.monthly_payment);
        assert!(rows.len() as u64 <= u64::from(years) * 12);
    }
}

#[test]
fn test_overflowing_principal_is_zeroed() {
    let summary = compute_summary(Decimal::MAX, dec!(20), 30);
    assert_eq!(summary, LoanSummary::default());
}

#[test]
fn test_analysis_envelope() {
    let out = analyze_loan(&LoanTerms::new(dec!(100_000), dec!(8), 1)).unwrap();
    assert_eq!(out.result.schedule.len(), 12);
    assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");

    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["summary"]["monthly_payment"].is_string());
    assert_eq!(json["result"]["schedule"][0]["month"], 1);
}

#[test]
fn test_terms_deserialize_from_json_numbers() {
    let terms: LoanTerms = serde_json::from_str(
        r#"{"principal": 1000000, "annual_rate_percent": 10.5, "term_years": 15}"#,
    )
    .unwrap();
    assert_eq!(terms, LoanTerms::new(dec!(1_000_000), dec!(10.5), 15));
}

// ===========================================================================
// Properties
// ===========================================================================

fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (1_000i64..50_000_000i64).prop_map(Decimal::from)
}

/// 0.00% to 30.00% in basis-point steps.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=3_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_payment_non_negative_and_interest_positive(
        principal in principal_strategy(),
        rate in rate_strategy(),
        years in 1u32..=30,
    ) {
        let s = compute_summary(principal, rate, years);
        prop_assert!(s.monthly_payment >= Decimal::ZERO);
        if rate > Decimal::ZERO {
            prop_assert!(s.total_interest > Decimal::ZERO);
        }
    }

    #[test]
    fn prop_zero_rate_is_straight_line(
        principal in principal_strategy(),
        years in 1u32..=30,
    ) {
        let s = compute_summary(principal, Decimal::ZERO, years);
        prop_assert_eq!(s.monthly_payment, principal / Decimal::from(years * 12));
        prop_assert!(s.total_interest.abs() < dec!(0.000001));
    }

    #[test]
    fn prop_schedule_repays_principal(
        principal in principal_strategy(),
        rate in rate_strategy(),
        years in 1u32..=30,
    ) {
        let s = compute_summary(principal, rate, years);
        let rows = build_schedule(principal, rate, years, s.monthly_payment);

        prop_assert!(!rows.is_empty());
        prop_assert!(rows.len() as u32 <= years * 12);
        prop_assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);

        let repaid: Decimal = rows.iter().map(|r| r.principal).sum();
        prop_assert!((repaid - principal).abs() < BALANCE_EPSILON);

        let mut previous = principal;
        for (idx, row) in rows.iter().enumerate() {
            prop_assert_eq!(row.month, idx as u32 + 1);
            prop_assert!(row.balance <= previous);
            prop_assert!((row.payment - (row.principal + row.interest)).abs() < dec!(0.0000001));
            previous = row.balance;
        }
    }
}
