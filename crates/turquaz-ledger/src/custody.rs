//! The asset custody host seam.
//!
//! The ledger never moves real assets itself. Deposits pull funds from the
//! depositor's wallet into engine custody and withdrawals push them back,
//! both through a [`CustodyHost`]. Settlement never touches custody.

use std::collections::HashMap;

use rust_decimal::Decimal;
use turquaz_types::{Address, Asset, Result, TurquazError};

/// Primitive fungible-asset movements provided by the host environment.
pub trait CustodyHost: Send {
    /// Move `amount` of `asset` from `from` into engine custody.
    ///
    /// Native assets arrive as attached value; tokens via a pre-approved
    /// allowance.
    fn pull(&mut self, from: Address, asset: Asset, amount: Decimal) -> Result<()>;

    /// Release `amount` of `asset` from engine custody to `to`.
    fn push(&mut self, to: Address, asset: Asset, amount: Decimal) -> Result<()>;

    /// Quantity of `asset` currently held by the engine.
    fn held(&self, asset: Asset) -> Decimal;
}

/// In-process custody host with wallet balances and token allowances.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    wallets: HashMap<(Address, Asset), Decimal>,
    /// Owner → engine allowances, tokens only.
    allowances: HashMap<(Address, Asset), Decimal>,
    held: HashMap<Asset, Decimal>,
}

impl InMemoryCustody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an external wallet (faucet / genesis allocation). Saturates.
    pub fn mint(&mut self, to: Address, asset: Asset, amount: Decimal) {
        let wallet = self.wallets.entry((to, asset)).or_insert(Decimal::ZERO);
        *wallet = wallet.saturating_add(amount);
    }

    /// Set the engine's allowance over `owner`'s `asset`.
    pub fn approve(&mut self, owner: Address, asset: Asset, amount: Decimal) {
        self.allowances.insert((owner, asset), amount);
    }

    #[must_use]
    pub fn wallet_balance(&self, owner: Address, asset: Asset) -> Decimal {
        self.wallets
            .get(&(owner, asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, asset: Asset) -> Decimal {
        self.allowances
            .get(&(owner, asset))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl CustodyHost for InMemoryCustody {
    fn pull(&mut self, from: Address, asset: Asset, amount: Decimal) -> Result<()> {
        let wallet = self.wallet_balance(from, asset);
        if wallet < amount {
            return Err(TurquazError::CustodyTransferFailed {
                reason: format!("wallet {from} holds {wallet} of {asset}, needs {amount}"),
            });
        }
        let held = self
            .held(asset)
            .checked_add(amount)
            .ok_or(TurquazError::ArithmeticOverflow)?;
        if !asset.is_native() {
            let allowance = self.allowance(from, asset);
            if allowance < amount {
                return Err(TurquazError::CustodyTransferFailed {
                    reason: format!("allowance {allowance} of {asset} below {amount}"),
                });
            }
            self.allowances.insert((from, asset), allowance - amount);
        }
        self.wallets.insert((from, asset), wallet - amount);
        self.held.insert(asset, held);
        Ok(())
    }

    fn push(&mut self, to: Address, asset: Asset, amount: Decimal) -> Result<()> {
        let held = self.held(asset);
        if held < amount {
            return Err(TurquazError::CustodyTransferFailed {
                reason: format!("custody holds {held} of {asset}, cannot release {amount}"),
            });
        }
        let wallet = self
            .wallet_balance(to, asset)
            .checked_add(amount)
            .ok_or(TurquazError::ArithmeticOverflow)?;
        self.held.insert(asset, held - amount);
        self.wallets.insert((to, asset), wallet);
        Ok(())
    }

    fn held(&self, asset: Asset) -> Decimal {
        self.held.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }
}
