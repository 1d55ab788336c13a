//! Ledger entry type for custodied balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Result, TurquazError};

/// The balance of a single (owner, asset) pair, in the asset's smallest unit.
///
/// Never negative. Zero is a valid steady state; entries are never destroyed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub balance: Decimal,
}

impl LedgerEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the sum does not fit.
    pub fn credit(&mut self, amount: Decimal) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TurquazError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Subtract `amount`, refusing to go negative.
    ///
    /// # Errors
    /// `InsufficientBalance` if `balance < amount`.
    pub fn debit(&mut self, amount: Decimal) -> Result<()> {
        if self.balance < amount {
            return Err(TurquazError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.balance.is_zero()
    }
}
