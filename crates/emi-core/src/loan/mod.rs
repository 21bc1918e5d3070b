//! Loan repayment calculations.
//!
//! [`engine`] holds the two pure operations ([`compute_summary`] and
//! [`build_schedule`]); [`analysis`] wraps them in the computation envelope
//! with warnings and the principal/interest breakdown. Only the schedule is
//! bounded by term length.

pub mod analysis;
pub mod engine;

pub use analysis::{
    analyze_loan, loan_breakdown, summarize_loan, validate_schedule_terms, LoanAnalysis,
    LoanBreakdown, LoanOverview, MAX_SCHEDULE_TERM_YEARS,
};
pub use engine::{build_schedule, compute_summary, LoanSummary, LoanTerms, ScheduleRow};
