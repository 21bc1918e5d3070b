use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EmiError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless the name says `percent`.
pub type Rate = Decimal;

/// Currency code. INR is the base currency every computed amount is expressed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    AUD,
    CAD,
    SGD,
    JPY,
    CHF,
    HKD,
    Other(String),
}

impl Currency {
    /// Three-letter ISO code.
    pub fn code(&self) -> &str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::SGD => "SGD",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::HKD => "HKD",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Display prefix placed before a formatted amount.
    pub fn symbol(&self) -> String {
        match self {
            Currency::INR => "₹".into(),
            Currency::USD => "$".into(),
            Currency::EUR => "€".into(),
            Currency::GBP => "£".into(),
            Currency::AUD => "A$".into(),
            Currency::CAD => "C$".into(),
            Currency::SGD => "S$".into(),
            Currency::JPY => "¥".into(),
            Currency::CHF => "CHF ".into(),
            Currency::HKD => "HK$".into(),
            Currency::Other(code) => format!("{code} "),
        }
    }

    pub fn is_base(&self) -> bool {
        *self == Currency::INR
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = EmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EmiError::UnknownCurrency(s.to_string()));
        }
        Ok(match code.as_str() {
            "INR" => Currency::INR,
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "AUD" => Currency::AUD,
            "CAD" => Currency::CAD,
            "SGD" => Currency::SGD,
            "JPY" => Currency::JPY,
            "CHF" => Currency::CHF,
            "HKD" => Currency::HKD,
            _ => Currency::Other(code),
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Re-wrap a transformed result, keeping methodology, assumptions and metadata.
    pub fn map<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
