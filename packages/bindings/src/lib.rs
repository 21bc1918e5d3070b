use std::collections::HashMap;

use emi_core::currency::{DisplayCurrency, RateTable};
use emi_core::loan::LoanTerms;
use emi_core::Currency;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan engine
//
// Schedule-building entry points reject terms above
// `emi_core::loan::MAX_SCHEDULE_TERM_YEARS`; `calculate_loan` accepts any term.
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let summary = emi_core::loan::compute_summary(
        terms.principal,
        terms.annual_rate_percent,
        terms.term_years,
    );
    serde_json::to_string(&summary).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct ScheduleBindingInput {
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
    /// Defaults to the EMI for these terms.
    #[serde(default)]
    monthly_payment: Option<Decimal>,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let terms = LoanTerms::new(input.principal, input.annual_rate_percent, input.term_years);
    emi_core::loan::validate_schedule_terms(&terms).map_err(to_napi_error)?;
    let payment = input
        .monthly_payment
        .unwrap_or_else(|| terms.summary().monthly_payment);
    let rows = terms.schedule(payment);
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::loan::analyze_loan(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Currency display
// ---------------------------------------------------------------------------

/// `rates_json` is the API's `conversion_rates` object (units per INR).
/// Missing rates fall back to INR with a warning.
fn display_for(
    currency: Option<String>,
    rates_json: Option<String>,
) -> NapiResult<(DisplayCurrency, Option<String>)> {
    let currency: Currency = match currency {
        Some(code) => code.parse().map_err(to_napi_error)?,
        None => return Ok((DisplayCurrency::base(), None)),
    };
    let table = match rates_json {
        Some(json) => {
            let rates: HashMap<String, Decimal> =
                serde_json::from_str(&json).map_err(to_napi_error)?;
            Some(RateTable::new(Currency::INR, rates))
        }
        None => None,
    };
    Ok(DisplayCurrency::resolve_or_base(currency, table.as_ref()))
}

#[napi]
pub fn loan_report(
    input_json: String,
    rates_json: Option<String>,
    currency: Option<String>,
) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let (display, warning) = display_for(currency, rates_json)?;

    let mut output = emi_core::loan::analyze_loan(&terms)
        .map_err(to_napi_error)?
        .map(|analysis| analysis.in_currency(&display));
    output.warnings.extend(warning);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Serialize)]
struct FormattedAmount {
    formatted: String,
    /// Currency actually used; INR when conversion was unavailable.
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

#[napi]
pub fn format_amount(
    amount: String,
    currency: Option<String>,
    rates_json: Option<String>,
) -> NapiResult<String> {
    let amount: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    let (display, warning) = display_for(currency, rates_json)?;
    let out = FormattedAmount {
        formatted: emi_core::currency::format_amount(amount, &display),
        currency: display.currency,
        warning,
    };
    serde_json::to_string(&out).map_err(to_napi_error)
}
