use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::error::Error;
use tracing::debug;

use emi_core::loan::{analyze_loan, summarize_loan, LoanTerms, ScheduleRow};

use crate::config::AppConfig;
use crate::exchange::{self, DisplayOptions};
use crate::input;

/// Loan terms, from a JSON file, piped JSON, or flags
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed, in base currency (INR)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in whole years (at most 100 for schedule and analyze)
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// First month to show
    #[arg(long, default_value_t = 1)]
    pub from: u32,

    /// Maximum number of months to show
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Summary and breakdown only. Builds no schedule, so any term is accepted.
pub fn run_summary(
    args: LoanArgs,
    opts: &DisplayOptions,
    cfg: &AppConfig,
) -> Result<Value, Box<dyn Error>> {
    let terms = read_terms(&args)?;
    let (display, currency_warnings) = exchange::resolve_display(opts, cfg)?;

    let mut output = summarize_loan(&terms).map(|overview| overview.in_currency(&display));
    output.warnings.extend(currency_warnings);
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(
    args: ScheduleArgs,
    opts: &DisplayOptions,
    cfg: &AppConfig,
) -> Result<Value, Box<dyn Error>> {
    let terms = read_terms(&args.loan)?;
    let (display, currency_warnings) = exchange::resolve_display(opts, cfg)?;

    let from = args.from.max(1);
    let limit = args.limit;
    let mut output = analyze_loan(&terms)?.map(|analysis| {
        let report = analysis.in_currency(&display);
        page_rows(report.schedule, from, limit)
    });
    output.warnings.extend(currency_warnings);
    Ok(serde_json::to_value(output)?)
}

pub fn run_analyze(
    args: LoanArgs,
    opts: &DisplayOptions,
    cfg: &AppConfig,
) -> Result<Value, Box<dyn Error>> {
    let terms = read_terms(&args)?;
    let (display, currency_warnings) = exchange::resolve_display(opts, cfg)?;

    let mut output = analyze_loan(&terms)?.map(|analysis| analysis.in_currency(&display));
    output.warnings.extend(currency_warnings);
    Ok(serde_json::to_value(output)?)
}

fn read_terms(args: &LoanArgs) -> Result<LoanTerms, Box<dyn Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if args.principal.is_none() {
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let years = args.years.ok_or("--years is required (or provide --input)")?;

    debug!(%principal, %rate, years, "loan terms from flags");
    Ok(LoanTerms::new(principal, rate, years))
}

/// Rows from month `from` onwards, at most `limit` of them.
fn page_rows(rows: Vec<ScheduleRow>, from: u32, limit: Option<usize>) -> Vec<ScheduleRow> {
    let skipped = rows.into_iter().skip_while(|row| row.month < from);
    match limit {
        Some(n) => skipped.take(n).collect(),
        None => skipped.collect(),
    }
}
