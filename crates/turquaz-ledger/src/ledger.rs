//! Custodied balance ledger.
//!
//! Tracks per-(owner, asset) balances backed by assets held in custody.
//! `deposit`/`withdraw` move assets across the custody boundary;
//! `credit_internal`/`debit_internal`/`apply` only re-label balances and are
//! reserved for the settlement engine. Every operation is all-or-nothing.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use turquaz_types::{Address, Asset, LedgerEntry, Result, TurquazError};

use crate::custody::{CustodyHost, InMemoryCustody};
use crate::supply_conservation::SupplyConservation;

/// One leg of an internal transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub owner: Address,
    pub asset: Asset,
    pub kind: PostingKind,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingKind {
    Credit,
    Debit,
}

impl Posting {
    #[must_use]
    pub fn credit(owner: Address, asset: Asset, amount: Decimal) -> Self {
        Self { owner, asset, kind: PostingKind::Credit, amount }
    }

    #[must_use]
    pub fn debit(owner: Address, asset: Asset, amount: Decimal) -> Self {
        Self { owner, asset, kind: PostingKind::Debit, amount }
    }

    fn signed_amount(&self) -> Decimal {
        match self.kind {
            PostingKind::Credit => self.amount,
            PostingKind::Debit => -self.amount,
        }
    }
}

/// The engine's balance ledger over a custody host.
#[derive(Debug)]
pub struct Ledger<C: CustodyHost = InMemoryCustody> {
    entries: HashMap<(Address, Asset), LedgerEntry>,
    custody: C,
    supply: SupplyConservation,
}

impl Ledger<InMemoryCustody> {
    /// A ledger over a fresh in-memory custody host.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(InMemoryCustody::new())
    }
}

impl<C: CustodyHost> Ledger<C> {
    #[must_use]
    pub fn new(custody: C) -> Self {
        Self {
            entries: HashMap::new(),
            custody,
            supply: SupplyConservation::new(),
        }
    }

    /// Pull `amount` of `asset` from `owner` into custody and credit them.
    ///
    /// Native deposits must attach exactly `amount` of value; token deposits
    /// must attach none.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is not a positive integer
    /// - `AmountMismatch` if the attached value is wrong for the asset
    /// - `ArithmeticOverflow` if the balance or the deposit total would not fit
    /// - `CustodyTransferFailed` if the host refuses the transfer
    pub fn deposit(
        &mut self,
        owner: Address,
        asset: Asset,
        amount: Decimal,
        attached_value: Decimal,
    ) -> Result<()> {
        check_amount(amount)?;
        let expected_value = if asset.is_native() { amount } else { Decimal::ZERO };
        if attached_value != expected_value {
            return Err(TurquazError::AmountMismatch {
                declared: expected_value,
                attached: attached_value,
            });
        }

        let mut entry = self.entry(owner, asset);
        entry.credit(amount)?;
        self.supply.checked_deposit(asset, amount)?;

        self.custody.pull(owner, asset, amount)?;
        self.entries.insert((owner, asset), entry);
        self.supply.record_deposit(asset, amount)?;

        tracing::info!(%owner, %asset, %amount, "Deposit credited");
        Ok(())
    }

    /// Debit `owner` and release `amount` of `asset` from custody to them.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount` is not a positive integer
    /// - `InsufficientBalance` if the ledger balance is below `amount`
    /// - `ArithmeticOverflow` if the withdrawal total would not fit
    /// - `CustodyTransferFailed` if the host refuses the transfer
    pub fn withdraw(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<()> {
        check_amount(amount)?;
        let mut entry = self.entry(owner, asset);
        entry.debit(amount)?;
        self.supply.checked_withdrawal(asset, amount)?;

        self.custody.push(owner, asset, amount)?;
        self.entries.insert((owner, asset), entry);
        self.supply.record_withdrawal(asset, amount)?;

        tracing::info!(%owner, %asset, %amount, "Withdrawal released");
        Ok(())
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address, asset: Asset) -> Decimal {
        self.entry(owner, asset).balance
    }

    fn entry(&self, owner: Address, asset: Asset) -> LedgerEntry {
        self.entries.get(&(owner, asset)).copied().unwrap_or_default()
    }

    /// Credit without custody movement. Settlement only.
    pub fn credit_internal(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<()> {
        self.apply(&[Posting::credit(owner, asset, amount)])
    }

    /// Debit without custody movement. Settlement only.
    ///
    /// # Errors
    /// `InsufficientBalance` rather than going negative.
    pub fn debit_internal(&mut self, owner: Address, asset: Asset, amount: Decimal) -> Result<()> {
        self.apply(&[Posting::debit(owner, asset, amount)])
    }

    /// Apply a batch of postings atomically.
    ///
    /// Postings are netted per (owner, asset) and every resulting balance is
    /// checked before any entry is written, so either all apply or none do.
    ///
    /// # Errors
    /// - `InvalidAmount` for a negative posting amount
    /// - `InsufficientBalance` if any net debit exceeds the balance
    /// - `ArithmeticOverflow` if any net credit does not fit
    pub fn apply(&mut self, postings: &[Posting]) -> Result<()> {
        let mut net: BTreeMap<(Address, Asset), Decimal> = BTreeMap::new();
        for posting in postings {
            if posting.amount.is_sign_negative() {
                return Err(TurquazError::InvalidAmount(posting.amount));
            }
            let slot = net
                .entry((posting.owner, posting.asset))
                .or_insert(Decimal::ZERO);
            *slot = slot
                .checked_add(posting.signed_amount())
                .ok_or(TurquazError::ArithmeticOverflow)?;
        }

        let mut staged = Vec::with_capacity(net.len());
        for ((owner, asset), delta) in net {
            let mut entry = self.entry(owner, asset);
            if delta.is_sign_negative() {
                entry.debit(-delta)?;
            } else {
                entry.credit(delta)?;
            }
            staged.push(((owner, asset), entry));
        }

        self.entries.extend(staged);
        Ok(())
    }

    /// Sum of all ledger balances for `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: Asset) -> Decimal {
        self.entries
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, entry)| entry.balance)
            .sum()
    }

    /// Check that the ledger is fully backed by custody for `asset`.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on any drift.
    pub fn verify_solvency(&self, asset: Asset) -> Result<()> {
        let result = self
            .supply
            .verify(asset, self.total_supply(asset), self.custody.held(asset));
        if let Err(err) = &result {
            tracing::warn!(%asset, error = %err, "Solvency check failed");
        }
        result
    }

    /// Check solvency for every asset ever deposited.
    pub fn verify_all(&self) -> Result<()> {
        self.supply
            .tracked_assets()
            .into_iter()
            .try_for_each(|asset| self.verify_solvency(asset))
    }

    #[must_use]
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Host-side access, e.g. to fund wallets. Never used during settlement.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }
}

fn check_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO || !amount.fract().is_zero() {
        return Err(TurquazError::InvalidAmount(amount));
    }
    Ok(())
}
