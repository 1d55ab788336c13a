//! Cumulative fill state keyed by order identity.
//!
//! Each counter is denominated in the asset its order releases and is capped
//! at the order's `release_amount`. Counters only grow.

use std::collections::HashMap;

use rust_decimal::Decimal;
use turquaz_types::{Order, OrderHash, Result, TurquazError};

#[derive(Debug, Default)]
pub struct FillTracker {
    filled: HashMap<OrderHash, Decimal>,
}

impl FillTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filled(&self, hash: &OrderHash) -> Decimal {
        self.filled.get(hash).copied().unwrap_or(Decimal::ZERO)
    }

    /// `release_amount` minus everything filled so far.
    #[must_use]
    pub fn remaining(&self, order: &Order, hash: &OrderHash) -> Decimal {
        order.release_amount - self.filled(hash)
    }

    /// # Errors
    /// `OrderFullyFilled` if `amount` exceeds what remains; nothing changes.
    pub fn record_fill(&mut self, order: &Order, hash: &OrderHash, amount: Decimal) -> Result<()> {
        let remaining = self.remaining(order, hash);
        if amount > remaining {
            return Err(TurquazError::OrderFullyFilled {
                requested: amount,
                remaining,
            });
        }
        *self.filled.entry(*hash).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Number of identities with recorded fills.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}
