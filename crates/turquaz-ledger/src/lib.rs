//! # turquaz-ledger
//!
//! **Custodied balances**: per-(owner, asset) ledger entries backed by assets
//! the engine holds in custody.
//!
//! ## Invariants
//!
//! - No entry is ever negative.
//! - Σ ledger(asset) == Σ deposits(asset) − Σ withdrawals(asset).
//! - Σ ledger(asset) <= custody held(asset).
//!
//! Only `deposit` and `withdraw` cross the custody boundary. Settlement moves
//! balances between entries through [`Ledger::apply`], which validates a
//! whole batch of [`Posting`]s before writing any of them.

pub mod custody;
pub mod ledger;
pub mod supply_conservation;

pub use custody::{CustodyHost, InMemoryCustody};
pub use ledger::{Ledger, Posting, PostingKind};
pub use supply_conservation::SupplyConservation;
