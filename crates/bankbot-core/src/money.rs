//! Money amounts as exchanged with the banking service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BankbotError, Result};

/// Non-negative amount of money in minor units (cents).
///
/// Always rendered with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates an amount from whole cents.
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Converts an amount as reported by the service (e.g. `50000.0`).
    ///
    /// Negative, NaN and infinite amounts are rejected.
    pub fn from_amount(amount: f64) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(BankbotError::validation(format!(
                "Amount must be non-negative, got {amount}"
            )));
        }
        let cents = (amount * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(BankbotError::validation("Amount is out of range"));
        }
        Ok(Self(cents as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
