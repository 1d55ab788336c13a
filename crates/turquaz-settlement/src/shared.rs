//! A lock-guarded engine handle for multi-threaded hosts.
//!
//! Every call takes the engine lock for its whole duration, so concurrent
//! callers observe each `deposit`/`withdraw`/`settle`/`force_cancel_all` as
//! one indivisible step. Two `settle` calls racing on the same order are
//! applied in lock order; the loser sees the reduced remaining amount.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use turquaz_ledger::{CustodyHost, InMemoryCustody};
use turquaz_types::{Address, Asset, Order, OrderStatus, Result};

use crate::engine::{SettlementEngine, SettlementReceipt};

pub struct SharedEngine<C: CustodyHost = InMemoryCustody> {
    inner: Arc<Mutex<SettlementEngine<C>>>,
}

impl<C: CustodyHost> Clone for SharedEngine<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CustodyHost> SharedEngine<C> {
    #[must_use]
    pub fn new(engine: SettlementEngine<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn deposit(
        &self,
        caller: Address,
        asset: Asset,
        amount: Decimal,
        attached_value: Decimal,
    ) -> Result<()> {
        self.inner.lock().deposit(caller, asset, amount, attached_value)
    }

    pub fn withdraw(&self, caller: Address, asset: Asset, amount: Decimal) -> Result<()> {
        self.inner.lock().withdraw(caller, asset, amount)
    }

    pub fn settle(
        &self,
        order_a: &Order,
        order_b: &Order,
        taker_is_order_a: bool,
    ) -> Result<SettlementReceipt> {
        self.inner.lock().settle(order_a, order_b, taker_is_order_a)
    }

    pub fn force_cancel_all(&self, caller: Address, cutoff: DateTime<Utc>) -> DateTime<Utc> {
        self.inner.lock().force_cancel_all(caller, cutoff)
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address, asset: Asset) -> Decimal {
        self.inner.lock().balance_of(owner, asset)
    }

    #[must_use]
    pub fn remaining(&self, order: &Order) -> Decimal {
        self.inner.lock().remaining(order)
    }

    #[must_use]
    pub fn is_cancelled(&self, order: &Order) -> bool {
        self.inner.lock().is_cancelled(order)
    }

    #[must_use]
    pub fn status(&self, order: &Order) -> OrderStatus {
        self.inner.lock().status(order)
    }

    pub fn verify_solvency(&self, asset: Asset) -> Result<()> {
        self.inner.lock().verify_solvency(asset)
    }

    /// Run `f` with exclusive access, e.g. to fund custody in one step.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut SettlementEngine<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
