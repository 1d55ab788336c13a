//! # turquaz-types
//!
//! Shared types, errors, and configuration for the **Turquaz** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`Asset`], [`OrderHash`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderStatus`]
//! - **Ledger model**: [`LedgerEntry`]
//! - **Configuration**: [`EngineConfig`], [`DomainConfig`]
//! - **Errors**: [`TurquazError`] with `TQ_ERR_` prefix codes
//! - **Constants**: fee and domain defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;

pub use balance::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `turquaz_types::constants::FOO`.
