use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{compute_summary, LoanSummary, LoanTerms, ScheduleRow};
use crate::error::EmiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::EmiResult;

/// Input ranges offered by the interactive calculator. Inputs outside them are
/// still computed, but flagged.
const TYPICAL_PRINCIPAL: (Decimal, Decimal) = (dec!(100_000), dec!(10_000_000));
const TYPICAL_RATE_PERCENT: (Decimal, Decimal) = (dec!(5), dec!(20));
const TYPICAL_TERM_YEARS: (u32, u32) = (1, 30);

/// Longest term for which a schedule is materialised (1,200 rows).
///
/// The summary has no such limit: it is a closed-form figure for any term.
pub const MAX_SCHEDULE_TERM_YEARS: u32 = 100;

const METHODOLOGY: &str = "Fixed-rate amortising loan (annuity EMI)";

/// Split of total payment into principal and interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBreakdown {
    pub principal: Money,
    pub interest: Money,
    /// Share of total payment, in percent, one decimal place.
    pub principal_pct: Rate,
    pub interest_pct: Rate,
}

/// Summary figures and breakdown, without the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOverview {
    pub summary: LoanSummary,
    pub breakdown: LoanBreakdown,
}

/// Summary, breakdown and schedule for one set of loan terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub summary: LoanSummary,
    pub breakdown: LoanBreakdown,
    pub schedule: Vec<ScheduleRow>,
}

/// Summary and breakdown for `terms`, wrapped in the standard envelope.
///
/// Never fails and never builds the schedule, so any term is accepted.
pub fn summarize_loan(terms: &LoanTerms) -> ComputationOutput<LoanOverview> {
    let start = Instant::now();
    let (overview, warnings) = overview_with_warnings(terms);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(METHODOLOGY, terms, warnings, elapsed, overview)
}

/// Run the summary and schedule for `terms` and wrap them in the standard envelope.
///
/// Degenerate inputs produce zeroed figures plus warnings. The only error is
/// a term longer than [`MAX_SCHEDULE_TERM_YEARS`].
pub fn analyze_loan(terms: &LoanTerms) -> EmiResult<ComputationOutput<LoanAnalysis>> {
    validate_schedule_terms(terms)?;

    let start = Instant::now();
    let (LoanOverview { summary, breakdown }, mut warnings) = overview_with_warnings(terms);

    let schedule = terms.schedule(summary.monthly_payment);
    if let Some(last) = schedule.last() {
        if !last.balance.is_zero() {
            warnings.push(format!(
                "schedule ends after {} months with {} still outstanding",
                last.month, last.balance
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        METHODOLOGY,
        terms,
        warnings,
        elapsed,
        LoanAnalysis {
            summary,
            breakdown,
            schedule,
        },
    ))
}

/// Reject terms whose schedule would be unreasonably long to build.
pub fn validate_schedule_terms(terms: &LoanTerms) -> EmiResult<()> {
    if terms.term_years > MAX_SCHEDULE_TERM_YEARS {
        return Err(EmiError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "schedule limited to {} years, got {}",
                MAX_SCHEDULE_TERM_YEARS, terms.term_years
            ),
        });
    }
    Ok(())
}

/// Principal versus interest share of the total payment.
pub fn loan_breakdown(principal: Money, summary: &LoanSummary) -> LoanBreakdown {
    let total = summary.total_payment;
    let (principal_pct, interest_pct) = if total.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            percent_of(principal, total),
            percent_of(summary.total_interest, total),
        )
    };

    LoanBreakdown {
        principal,
        interest: summary.total_interest,
        principal_pct,
        interest_pct,
    }
}

fn overview_with_warnings(terms: &LoanTerms) -> (LoanOverview, Vec<String>) {
    let mut warnings = input_warnings(terms);

    let summary = compute_summary(terms.principal, terms.annual_rate_percent, terms.term_years);
    warnings.extend(normalisation_warnings(terms, &summary));
    let breakdown = loan_breakdown(terms.principal, &summary);

    (LoanOverview { summary, breakdown }, warnings)
}

fn percent_of(part: Money, total: Money) -> Rate {
    part.checked_mul(dec!(100))
        .and_then(|scaled| scaled.checked_div(total))
        .map(|pct| pct.round_dp(1))
        .filter(|pct| !pct.is_zero())
        .unwrap_or(Decimal::ZERO)
}

fn input_warnings(terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();

    if terms.principal <= Decimal::ZERO {
        warnings.push("principal is not positive; figures degrade to zero".into());
    } else if terms.principal < TYPICAL_PRINCIPAL.0 || terms.principal > TYPICAL_PRINCIPAL.1 {
        warnings.push(format!(
            "principal {} is outside the typical range {} to {}",
            terms.principal, TYPICAL_PRINCIPAL.0, TYPICAL_PRINCIPAL.1
        ));
    }

    if terms.annual_rate_percent < Decimal::ZERO {
        warnings.push("negative interest rate".into());
    } else if terms.annual_rate_percent < TYPICAL_RATE_PERCENT.0
        || terms.annual_rate_percent > TYPICAL_RATE_PERCENT.1
    {
        warnings.push(format!(
            "interest rate {}% is outside the typical range {}% to {}%",
            terms.annual_rate_percent, TYPICAL_RATE_PERCENT.0, TYPICAL_RATE_PERCENT.1
        ));
    }

    if terms.term_years == 0 {
        warnings.push("term of zero years; no payments scheduled".into());
    } else if terms.term_years > TYPICAL_TERM_YEARS.1 {
        warnings.push(format!(
            "term of {} years is outside the typical range {} to {} years",
            terms.term_years, TYPICAL_TERM_YEARS.0, TYPICAL_TERM_YEARS.1
        ));
    }

    warnings
}

/// A zero figure is only suspicious when positive terms should have produced
/// a payment.
fn normalisation_warnings(terms: &LoanTerms, summary: &LoanSummary) -> Vec<String> {
    if terms.principal <= Decimal::ZERO || terms.term_years == 0 {
        return Vec::new();
    }
    let mut warnings = Vec::new();
    if summary.monthly_payment.is_zero() {
        warnings.push("monthly_payment could not be computed and was set to zero".into());
    }
    if summary.total_payment.is_zero() {
        warnings.push("total_payment could not be computed and was set to zero".into());
    }
    warnings
}
