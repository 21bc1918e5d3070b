use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::format::{format_amount, format_percent};
use super::rates::{DisplayCurrency, ExchangeRate};
use crate::loan::{LoanAnalysis, LoanBreakdown, LoanOverview, LoanSummary, ScheduleRow};
use crate::types::{Currency, Money};

/// Decimal places kept on converted schedule amounts.
const ROW_DISPLAY_DP: u32 = 2;

/// Summary figures rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedSummary {
    pub monthly_payment: String,
    pub total_payment: String,
    pub total_interest: String,
    pub principal_share: String,
    pub interest_share: String,
}

/// Summary and breakdown expressed in the display currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<ExchangeRate>,
    pub formatted: FormattedSummary,
    pub summary: LoanSummary,
    pub breakdown: LoanBreakdown,
}

/// A loan analysis with every amount expressed in the display currency.
///
/// Schedule amounts are rounded to cents; the summary keeps full precision
/// and carries formatted strings instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReport {
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<ExchangeRate>,
    pub summary: LoanSummary,
    pub breakdown: LoanBreakdown,
    pub formatted: FormattedSummary,
    pub schedule: Vec<ScheduleRow>,
}

impl LoanOverview {
    /// Scale the summary and breakdown for `display`. Percentages are unchanged.
    pub fn in_currency(&self, display: &DisplayCurrency) -> SummaryReport {
        SummaryReport {
            currency: display.currency.clone(),
            exchange_rate: display.rate,
            formatted: format_summary(&self.summary, &self.breakdown, display),
            summary: convert_summary(&self.summary, display),
            breakdown: convert_breakdown(&self.breakdown, display),
        }
    }
}

impl LoanAnalysis {
    /// Scale every amount for `display`. Months and percentages are unchanged.
    pub fn in_currency(&self, display: &DisplayCurrency) -> LoanReport {
        LoanReport {
            currency: display.currency.clone(),
            exchange_rate: display.rate,
            summary: convert_summary(&self.summary, display),
            breakdown: convert_breakdown(&self.breakdown, display),
            formatted: format_summary(&self.summary, &self.breakdown, display),
            schedule: self
                .schedule
                .iter()
                .map(|row| convert_row(row, display))
                .collect(),
        }
    }
}

fn format_summary(
    summary: &LoanSummary,
    breakdown: &LoanBreakdown,
    display: &DisplayCurrency,
) -> FormattedSummary {
    FormattedSummary {
        monthly_payment: format_amount(summary.monthly_payment, display),
        total_payment: format_amount(summary.total_payment, display),
        total_interest: format_amount(summary.total_interest, display),
        principal_share: format_percent(breakdown.principal_pct),
        interest_share: format_percent(breakdown.interest_pct),
    }
}

pub fn convert_summary(summary: &LoanSummary, display: &DisplayCurrency) -> LoanSummary {
    LoanSummary {
        monthly_payment: display.convert(summary.monthly_payment),
        total_payment: display.convert(summary.total_payment),
        total_interest: display.convert(summary.total_interest),
    }
}

fn convert_breakdown(breakdown: &LoanBreakdown, display: &DisplayCurrency) -> LoanBreakdown {
    LoanBreakdown {
        principal: display.convert(breakdown.principal),
        interest: display.convert(breakdown.interest),
        ..breakdown.clone()
    }
}

/// Convert a schedule row and round its amounts to cents.
pub fn convert_row(row: &ScheduleRow, display: &DisplayCurrency) -> ScheduleRow {
    let cents = |amount: Money| {
        display
            .convert(amount)
            .round_dp_with_strategy(ROW_DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
    };
    ScheduleRow {
        month: row.month,
        payment: cents(row.payment),
        principal: cents(row.principal),
        interest: cents(row.interest),
        balance: cents(row.balance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{analyze_loan, summarize_loan, LoanTerms};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_report_is_unscaled() {
        let analysis = analyze_loan(&LoanTerms::new(dec!(500_000), Decimal::ZERO, 5))
            .unwrap()
            .result;
        let report = analysis.in_currency(&DisplayCurrency::base());
        assert_eq!(report.summary, analysis.summary);
        assert_eq!(report.schedule.len(), analysis.schedule.len());
        assert_eq!(report.formatted.monthly_payment, "₹8,333");
        assert_eq!(report.formatted.interest_share, "0%");
    }

    #[test]
    fn test_foreign_report_scales_amounts_only() {
        let analysis = analyze_loan(&LoanTerms::new(dec!(1_000_000), dec!(10.5), 15))
            .unwrap()
            .result;
        let display = DisplayCurrency::new(Currency::USD, Some(ExchangeRate::new(dec!(80)).unwrap()));
        let report = analysis.in_currency(&display);

        assert_eq!(report.currency, Currency::USD);
        assert_eq!(report.schedule.len(), analysis.schedule.len());
        assert_eq!(report.schedule[0].month, 1);
        assert_eq!(report.breakdown.principal, dec!(12_500));
        assert_eq!(report.breakdown.principal_pct, analysis.breakdown.principal_pct);
        assert_eq!(report.formatted.monthly_payment, "$138.17");
        assert_eq!(report.schedule.last().unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_rows_rounded_to_cents() {
        let analysis = analyze_loan(&LoanTerms::new(dec!(500_000), Decimal::ZERO, 5))
            .unwrap()
            .result;
        assert!(analysis.schedule[0].payment.scale() > 2);

        let report = analysis.in_currency(&DisplayCurrency::base());
        let first = &report.schedule[0];
        assert_eq!(first.payment, dec!(8333.33));
        assert_eq!(first.balance, dec!(491666.67));
        assert!(report.schedule.iter().all(|row| row.payment.scale() <= 2
            && row.principal.scale() <= 2
            && row.interest.scale() <= 2
            && row.balance.scale() <= 2));
    }

    #[test]
    fn test_summary_report_matches_full_report() {
        let terms = LoanTerms::new(dec!(1_000_000), dec!(10.5), 15);
        let display = DisplayCurrency::new(Currency::USD, Some(ExchangeRate::new(dec!(80)).unwrap()));

        let summary = summarize_loan(&terms).result.in_currency(&display);
        let full = analyze_loan(&terms).unwrap().result.in_currency(&display);
        assert_eq!(summary.formatted, full.formatted);
        assert_eq!(summary.summary, full.summary);
        assert_eq!(summary.breakdown, full.breakdown);
        assert_eq!(summary.exchange_rate, full.exchange_rate);
    }
}
