use crate::error::{Result, StatementError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do when a (year, currency) pair has no entry in the table.
///
/// The legacy behavior is to fall back to a rate of 1.0, which silently
/// leaves foreign-currency values unconverted. That stays available (and is
/// the default, since downstream consumers depend on it) but it is now an
/// explicit choice, and `Strict` is offered for callers that would rather
/// fail loudly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RatePolicy {
    #[default]
    Fallback,
    Strict,
}

/// Immutable (fiscal year, currency code) → USD rate table.
#[derive(Debug, Clone)]
pub struct ExchangeRateTable {
    rates: HashMap<(i32, String), f64>,
    policy: RatePolicy,
}

impl ExchangeRateTable {
    pub fn new(policy: RatePolicy) -> Self {
        Self {
            rates: HashMap::new(),
            policy,
        }
    }

    pub fn with_rate(mut self, year: i32, currency: &str, rate: f64) -> Self {
        self.rates.insert((year, currency.to_uppercase()), rate);
        self
    }

    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    /// The USD rate applicable to `currency` in `year`.
    ///
    /// USD is always 1.0. Unknown pairs follow the table's [`RatePolicy`].
    pub fn rate(&self, currency: &str, year: i32) -> Result<f64> {
        let code = currency.trim().to_uppercase();
        if code == "USD" {
            return Ok(1.0);
        }

        match self.rates.get(&(year, code.clone())) {
            Some(rate) => Ok(*rate),
            None => match self.policy {
                RatePolicy::Fallback => {
                    warn!(
                        "No exchange rate for {} in {}; falling back to 1.0",
                        code, year
                    );
                    Ok(1.0)
                }
                RatePolicy::Strict => Err(StatementError::MissingRate {
                    currency: code,
                    year,
                }),
            },
        }
    }

    /// The built-in table: yearly average USD rates for the currencies the
    /// source documents are known to use.
    pub fn standard() -> Self {
        Self::standard_with_policy(RatePolicy::default())
    }

    pub fn standard_with_policy(policy: RatePolicy) -> Self {
        let mut table = Self::new(policy);
        for (year, currency, rate) in STANDARD_RATES {
            table = table.with_rate(*year, currency, *rate);
        }
        table
    }
}

const STANDARD_RATES: &[(i32, &str, f64)] = &[
    (2021, "COP", 0.00027),
    (2022, "COP", 0.00024),
    (2023, "COP", 0.00023),
    (2024, "COP", 0.00024),
    (2021, "MXN", 0.049),
    (2022, "MXN", 0.050),
    (2023, "MXN", 0.056),
    (2024, "MXN", 0.055),
    (2021, "EUR", 1.18),
    (2022, "EUR", 1.05),
    (2023, "EUR", 1.08),
    (2024, "EUR", 1.08),
    (2021, "PEN", 0.26),
    (2022, "PEN", 0.26),
    (2023, "PEN", 0.27),
    (2024, "PEN", 0.27),
    (2021, "BRL", 0.19),
    (2022, "BRL", 0.19),
    (2023, "BRL", 0.20),
    (2024, "BRL", 0.19),
    (2021, "CLP", 0.0013),
    (2022, "CLP", 0.0011),
    (2023, "CLP", 0.0012),
    (2024, "CLP", 0.0011),
    (2021, "ARS", 0.0105),
    (2022, "ARS", 0.0077),
    (2023, "ARS", 0.0036),
    (2024, "ARS", 0.0011),
];
