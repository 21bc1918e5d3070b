//! Fixed-rate instalment loan engine: EMI summary and amortisation schedule.
//!
//! Both operations are total. Any figure that cannot be represented (an
//! overflowing power, a division by zero) is normalised to zero instead of
//! being reported as an error. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Remaining balance below which the loan is treated as fully repaid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Loan parameters supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed, in base-currency units.
    pub principal: Money,
    /// Annual interest rate as a percentage (10.5 = 10.5%).
    pub annual_rate_percent: Rate,
    /// Loan term in whole years.
    pub term_years: u32,
}

/// Aggregate repayment figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Equated monthly instalment.
    pub monthly_payment: Money,
    /// Instalment multiplied by the number of scheduled payments.
    pub total_payment: Money,
    /// Total payment less the principal.
    pub total_interest: Money,
}

/// One month of the amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Outstanding balance after this month's payment.
    pub balance: Money,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Rate, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    pub fn summary(&self) -> LoanSummary {
        compute_summary(self.principal, self.annual_rate_percent, self.term_years)
    }

    pub fn schedule(&self, monthly_payment: Money) -> Vec<ScheduleRow> {
        build_schedule(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            monthly_payment,
        )
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the EMI, total payment and total interest for a fixed-rate loan.
///
/// `payment = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and
/// `n` the number of monthly payments. A zero rate pays `P / n` per month.
pub fn compute_summary(principal: Money, annual_rate_percent: Rate, term_years: u32) -> LoanSummary {
    let payments = number_of_payments(term_years);

    let monthly_payment = match (monthly_rate(annual_rate_percent), payments) {
        (Some(rate), Some(n)) => annuity_payment(principal, rate, n),
        _ => None,
    };
    let total_payment = match (monthly_payment, payments) {
        (Some(pmt), Some(n)) => pmt.checked_mul(Decimal::from(n)),
        _ => None,
    };
    let total_interest = total_payment.and_then(|total| total.checked_sub(principal));

    LoanSummary {
        monthly_payment: normalize("monthly_payment", monthly_payment),
        total_payment: normalize("total_payment", total_payment),
        total_interest: normalize("total_interest", total_interest),
    }
}

/// Build the month-by-month amortisation schedule for `monthly_payment`.
///
/// Stops at the first month that clears the balance, and never runs past
/// `term_years * 12` months.
pub fn build_schedule(
    principal: Money,
    annual_rate_percent: Rate,
    term_years: u32,
    monthly_payment: Money,
) -> Vec<ScheduleRow> {
    let (Some(rate), Some(max_months)) = (
        monthly_rate(annual_rate_percent),
        number_of_payments(term_years),
    ) else {
        debug!(term_years, "schedule inputs not representable; returning empty schedule");
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(max_months.min(1_200) as usize);
    let mut balance = principal;

    for month in 1..=max_months {
        let Some(row) = amortise_month(month, balance, rate, monthly_payment) else {
            debug!(month, %balance, "schedule arithmetic overflowed; truncating");
            break;
        };
        balance = row.balance;
        rows.push(row);

        if balance <= Decimal::ZERO {
            break;
        }
    }

    trace!(rows = rows.len(), max_months, "amortisation schedule built");
    rows
}

/// Monthly rate as a decimal fraction: `annual% / 100 / 12`.
pub fn monthly_rate(annual_rate_percent: Rate) -> Option<Rate> {
    annual_rate_percent
        .checked_div(dec!(100))?
        .checked_div(Decimal::from(MONTHS_PER_YEAR))
}

/// Number of monthly payments over the term, `None` if it overflows.
pub fn number_of_payments(term_years: u32) -> Option<u32> {
    term_years.checked_mul(MONTHS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn annuity_payment(principal: Money, monthly_rate: Rate, n: u32) -> Option<Money> {
    if monthly_rate.is_zero() {
        return principal.checked_div(Decimal::from(n));
    }

    let growth = checked_pow(Decimal::ONE.checked_add(monthly_rate)?, n)?;
    principal
        .checked_mul(monthly_rate)?
        .checked_mul(growth)?
        .checked_div(growth.checked_sub(Decimal::ONE)?)
}

/// One schedule step. The scheduled payment is replaced by `balance + interest`
/// when the balance has dropped below it, so the loan closes at exactly zero.
fn amortise_month(
    month: u32,
    balance: Money,
    monthly_rate: Rate,
    scheduled_payment: Money,
) -> Option<ScheduleRow> {
    let interest = balance.checked_mul(monthly_rate)?;

    let (payment, principal) = if balance < scheduled_payment {
        (balance.checked_add(interest)?, balance)
    } else {
        (scheduled_payment, scheduled_payment.checked_sub(interest)?)
    };

    let mut closing = balance.checked_sub(principal)?;
    if closing < BALANCE_EPSILON {
        closing = Decimal::ZERO;
    }

    Some(ScheduleRow {
        month,
        payment,
        principal,
        interest,
        balance: closing,
    })
}

/// `base^n` by repeated squaring; `None` on overflow.
fn checked_pow(base: Decimal, mut n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut factor = base;
    while n > 0 {
        if n & 1 == 1 {
            result = result.checked_mul(factor)?;
        }
        n >>= 1;
        if n > 0 {
            factor = factor.checked_mul(factor)?;
        }
    }
    Some(result)
}

/// Unrepresentable figures become zero.
fn normalize(field: &'static str, value: Option<Money>) -> Money {
    match value {
        Some(v) => v,
        None => {
            debug!(field, "figure not representable; normalised to zero");
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
