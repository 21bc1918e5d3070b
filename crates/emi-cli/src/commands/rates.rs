use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::time::Instant;

use emi_core::currency::{ExchangeRate, RateTable};
use emi_core::{with_metadata, Currency};

use crate::config::AppConfig;
use crate::exchange::{self, DisplayOptions};

/// Arguments for the exchange-rate listing
#[derive(Args)]
pub struct RatesArgs {
    /// Only list these currency codes (comma-separated, e.g. "USD,EUR")
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,
}

/// One quoted currency.
#[derive(Debug, Serialize)]
pub struct RateRow {
    pub currency: String,
    /// Units of this currency per one INR.
    pub quote: Decimal,
    /// INR per one unit of this currency.
    pub base_per_unit: Decimal,
}

pub fn run_rates(args: RatesArgs, opts: &DisplayOptions, cfg: &AppConfig) -> Result<Value, Box<dyn Error>> {
    let start = Instant::now();
    let table = exchange::load_rate_table(opts, cfg)?;

    let wanted: Option<Vec<Currency>> = match args.only {
        Some(codes) => Some(
            codes
                .iter()
                .map(|c| c.parse::<Currency>())
                .collect::<Result<_, _>>()?,
        ),
        None => None,
    };

    let (rows, warnings) = rate_rows(&table, wanted.as_deref());

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Exchange-rate lookup",
        &serde_json::json!({
            "base": table.base.code(),
            "source": source_label(opts),
        }),
        warnings,
        elapsed,
        rows,
    );
    Ok(serde_json::to_value(output)?)
}

fn rate_rows(table: &RateTable, wanted: Option<&[Currency]>) -> (Vec<RateRow>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut codes: Vec<&String> = match wanted {
        Some(list) => list
            .iter()
            .filter_map(|c| {
                let found = table.rates.get_key_value(c.code()).map(|(k, _)| k);
                if found.is_none() {
                    warnings.push(format!("no quote for {c}"));
                }
                found
            })
            .collect(),
        None => table.rates.keys().collect(),
    };
    codes.sort();

    let rows = codes
        .into_iter()
        .filter_map(|code| {
            let quote = table.rates[code];
            match ExchangeRate::from_quote(quote) {
                Ok(rate) => Some(RateRow {
                    currency: code.clone(),
                    quote,
                    base_per_unit: rate.value().round_dp(6),
                }),
                Err(_) => {
                    warnings.push(format!("ignoring non-positive quote for {code}"));
                    None
                }
            }
        })
        .collect();

    (rows, warnings)
}

fn source_label(opts: &DisplayOptions) -> &'static str {
    match (opts.offline, opts.rates_file.is_some()) {
        (true, _) => "file",
        (false, true) => "api+file",
        (false, false) => "api",
    }
}
