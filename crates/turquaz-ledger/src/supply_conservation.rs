//! Supply conservation and solvency checks.
//!
//! Invariants checked per asset:
//! ```text
//! Σ ledger == Σ deposits − Σ withdrawals
//! Σ ledger <= custody held
//! ```
//!
//! Settlement only moves balances between ledger entries (fees included),
//! so neither side of either equation changes during a trade.

use std::collections::HashMap;

use rust_decimal::Decimal;
use turquaz_types::{Asset, Result, TurquazError};

/// Tracks per-asset deposit and withdrawal totals since deployment.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    deposits: HashMap<Asset, Decimal>,
    withdrawals: HashMap<Asset, Decimal>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit total after adding `amount`, without recording it.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total does not fit.
    pub fn checked_deposit(&self, asset: Asset, amount: Decimal) -> Result<Decimal> {
        self.total_deposits(asset)
            .checked_add(amount)
            .ok_or(TurquazError::ArithmeticOverflow)
    }

    /// Withdrawal total after adding `amount`, without recording it.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the running total does not fit.
    pub fn checked_withdrawal(&self, asset: Asset, amount: Decimal) -> Result<Decimal> {
        self.total_withdrawals(asset)
            .checked_add(amount)
            .ok_or(TurquazError::ArithmeticOverflow)
    }

    pub fn record_deposit(&mut self, asset: Asset, amount: Decimal) -> Result<()> {
        let total = self.checked_deposit(asset, amount)?;
        self.deposits.insert(asset, total);
        Ok(())
    }

    pub fn record_withdrawal(&mut self, asset: Asset, amount: Decimal) -> Result<()> {
        let total = self.checked_withdrawal(asset, amount)?;
        self.withdrawals.insert(asset, total);
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self, asset: Asset) -> Decimal {
        self.deposits.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_withdrawals(&self, asset: Asset) -> Decimal {
        self.withdrawals.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Expected ledger total for an asset: deposits − withdrawals.
    #[must_use]
    pub fn expected_supply(&self, asset: Asset) -> Decimal {
        self.total_deposits(asset) - self.total_withdrawals(asset)
    }

    /// # Errors
    /// `SupplyInvariantViolation` if the ledger total differs from
    /// deposits − withdrawals, or exceeds what custody actually holds.
    pub fn verify(&self, asset: Asset, ledger_total: Decimal, custody_held: Decimal) -> Result<()> {
        let expected = self.expected_supply(asset);
        if ledger_total != expected {
            return Err(TurquazError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: ledger total {ledger_total} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.total_deposits(asset),
                    self.total_withdrawals(asset),
                ),
            });
        }
        if ledger_total > custody_held {
            return Err(TurquazError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: ledger total {ledger_total} exceeds custody {custody_held}"
                ),
            });
        }
        Ok(())
    }

    /// Every asset that has ever been deposited.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self.deposits.keys().copied().collect();
        assets.sort();
        assets
    }
}
