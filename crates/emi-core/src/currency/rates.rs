use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::EmiError;
use crate::types::{Currency, Money};
use crate::EmiResult;

/// Quoted conversion rates for one base currency, as returned by the rate API:
/// units of each target currency per one unit of base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: Currency,
    pub rates: HashMap<String, Decimal>,
}

/// Base-currency units per one unit of a target currency.
///
/// Displayed amounts are `amount / rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct ExchangeRate(Decimal);

impl TryFrom<Decimal> for ExchangeRate {
    type Error = EmiError;

    fn try_from(base_per_unit: Decimal) -> EmiResult<Self> {
        Self::new(base_per_unit)
    }
}

impl ExchangeRate {
    /// From a direct quote (base units per target unit). Must be positive.
    pub fn new(base_per_unit: Decimal) -> EmiResult<Self> {
        if base_per_unit <= Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "exchange_rate".into(),
                reason: "Exchange rate must be positive".into(),
            });
        }
        Ok(Self(base_per_unit))
    }

    /// From an API quote (target units per base unit).
    pub fn from_quote(target_per_base: Decimal) -> EmiResult<Self> {
        if target_per_base <= Decimal::ZERO {
            return Err(EmiError::InvalidInput {
                field: "exchange_rate".into(),
                reason: "Quoted rate must be positive".into(),
            });
        }
        let inverted = Decimal::ONE
            .checked_div(target_per_base)
            .ok_or_else(|| EmiError::RateUnavailable("quote too small to invert".into()))?;
        Self::new(inverted)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl RateTable {
    pub fn new(base: Currency, rates: HashMap<String, Decimal>) -> Self {
        Self { base, rates }
    }

    /// Rate needed to display amounts in `currency`. `None` for the base currency.
    pub fn exchange_rate(&self, currency: &Currency) -> EmiResult<Option<ExchangeRate>> {
        if *currency == self.base {
            return Ok(None);
        }
        let quote = self
            .rates
            .get(currency.code())
            .ok_or_else(|| EmiError::RateUnavailable(format!("no quote for {currency}")))?;
        ExchangeRate::from_quote(*quote).map(Some)
    }

    /// Replace quotes with a newer table. The base currency must match.
    pub fn merge_newer(&mut self, newer: RateTable) -> EmiResult<()> {
        if newer.base != self.base {
            return Err(EmiError::InvalidInput {
                field: "base".into(),
                reason: format!("cannot merge {} quotes into a {} table", newer.base, self.base),
            });
        }
        self.rates.extend(newer.rates);
        Ok(())
    }
}

/// Currency in which amounts are shown, with the rate to reach it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayCurrency {
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<ExchangeRate>,
}

impl DisplayCurrency {
    /// No conversion: amounts shown as computed.
    pub fn base() -> Self {
        Self::default()
    }

    pub fn new(currency: Currency, rate: Option<ExchangeRate>) -> Self {
        Self { currency, rate }
    }

    /// Look `currency` up in `table`.
    pub fn from_table(table: &RateTable, currency: Currency) -> EmiResult<Self> {
        let rate = table.exchange_rate(&currency)?;
        Ok(Self { currency, rate })
    }

    /// Display in `requested` if `table` can convert to it, otherwise in the
    /// base currency together with a warning for the caller to surface.
    pub fn resolve_or_base(requested: Currency, table: Option<&RateTable>) -> (Self, Option<String>) {
        if requested.is_base() {
            return (Self::base(), None);
        }
        let reason = match table.map(|t| Self::from_table(t, requested.clone())) {
            Some(Ok(display)) => return (display, None),
            Some(Err(e)) => e.to_string(),
            None => "no rate table".to_string(),
        };
        (
            Self::base(),
            Some(format!(
                "exchange rates unavailable for {requested} ({reason}); showing amounts in {}",
                Currency::INR
            )),
        )
    }

    /// Scale a base-currency amount for display.
    pub fn convert(&self, amount: Money) -> Money {
        match self.rate {
            Some(rate) => amount.checked_div(rate.value()).unwrap_or(Decimal::ZERO),
            None => amount,
        }
    }

    /// True when amounts are shown as computed (grouping follows the base locale).
    pub fn is_base(&self) -> bool {
        self.rate.is_none() && self.currency.is_base()
    }
}
