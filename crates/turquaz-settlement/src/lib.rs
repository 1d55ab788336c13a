//! # turquaz-settlement
//!
//! **Two-order settlement**: validates a match between two signed orders
//! and atomically exchanges custodied balances between their creators.
//!
//! ## Components
//!
//! - [`CancellationRegistry`]: per-creator force-cancel watermarks
//! - [`FillTracker`]: cumulative fills keyed by order identity
//! - [`pricing`]: exact ratio prices, clearing and fee arithmetic
//! - [`SettlementEngine`]: orchestrates the checks and the ledger mutation
//! - [`SharedEngine`]: `Arc<Mutex<_>>` handle serializing every operation
//!
//! ## Flow
//!
//! ```text
//! relayer ─▶ settle(A, B, taker) ─▶ checks 0..12 ─▶ clear at maker price
//!                                                  ─▶ Ledger::apply(postings)
//!                                                  ─▶ FillTracker::record_fill ×2
//! ```

pub mod cancellation;
pub mod clock;
pub mod engine;
pub mod fill_tracker;
pub mod pricing;
pub mod shared;

pub use cancellation::CancellationRegistry;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{SettlementEngine, SettlementReceipt};
pub use fill_tracker::FillTracker;
pub use pricing::Price;
pub use shared::SharedEngine;
