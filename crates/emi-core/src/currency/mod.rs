//! Display-side currency handling.
//!
//! Everything here runs after the loan engine: amounts are computed in the
//! base currency (INR) and only scaled and formatted on the way out.

pub mod format;
pub mod rates;
pub mod report;

pub use format::{format_amount, format_in_currency, format_percent, group_digits, Grouping};
pub use rates::{DisplayCurrency, ExchangeRate, RateTable};
pub use report::{FormattedSummary, LoanReport, SummaryReport};
