//! Order types for the Turquaz settlement engine.
//!
//! An [`Order`] is an immutable trade intent created and signed off-system.
//! The engine borrows orders for validation and never stores them; it only
//! keeps per-[`OrderHash`](crate::OrderHash) fill state.

use chrono::{DateTime, Utc};
use ed25519_dalek::Signature;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset};

/// Which side of the trading pair an order is on, derived from its quote asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    /// Releases the quote asset, requests the traded asset.
    Buy,
    /// Releases the traded asset, requests the quote asset.
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Lifecycle status of an order identity, as observed by the engine.
///
/// ```text
/// Open ──▶ PartiallyFilled ──▶ FullyFilled
///   │             │
///   └─────────────┴──▶ Cancelled | Expired
/// ```
///
/// `Invalid` is reported for malformed orders regardless of engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    FullyFilled,
    Cancelled,
    Expired,
    /// Fails structural checks and can never settle.
    Invalid,
}

impl OrderStatus {
    /// Terminal states admit no further fills.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::FullyFilled | Self::Cancelled | Self::Expired | Self::Invalid
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::FullyFilled => write!(f, "FULLY_FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Invalid => write!(f, "INVALID"),
        }
    }
}

/// A signed trade intent.
///
/// Amounts are integral quantities of each asset's smallest unit.
/// Changing any field after signing changes the order's identity, so the
/// original signature no longer authorizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identity authorizing the trade.
    pub creator: Address,
    /// Identity receiving the relayer fee charged on this order's leg.
    pub fee_recipient: Address,
    /// The quote asset used to express price.
    pub base_pair: Asset,
    pub requested_asset: Asset,
    pub released_asset: Asset,
    /// Quantity of `requested_asset` demanded.
    pub request_amount: Decimal,
    /// Quantity of `released_asset` offered. Caps cumulative fills.
    pub release_amount: Decimal,
    /// Optional dust floor per fill, in units of `released_asset`.
    pub min_settle_amount: Option<Decimal>,
    pub creation_time: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
    /// Disambiguates otherwise identical orders.
    pub rand_nonce: u64,
    /// Ed25519 signature over the order hash. Delegated orders carry none.
    pub signature: Option<Signature>,
}

impl Order {
    /// Side derived from the quote asset: releasing the quote asset is a buy.
    #[must_use]
    pub fn side(&self) -> OrderSide {
        if self.released_asset == self.base_pair {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// The non-quote asset of the pair.
    #[must_use]
    pub fn traded_asset(&self) -> Asset {
        match self.side() {
            OrderSide::Buy => self.requested_asset,
            OrderSide::Sell => self.released_asset,
        }
    }

    /// `true` once `now` is strictly past the expiration time.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration_time
    }

    /// Structural checks that do not depend on engine state.
    ///
    /// Returns the reason on failure; the caller decides which leg to blame.
    pub fn check_well_formed(&self) -> std::result::Result<(), String> {
        if self.requested_asset == self.released_asset {
            return Err("requested and released asset are identical".into());
        }
        if self.base_pair != self.requested_asset && self.base_pair != self.released_asset {
            return Err(format!("quote asset {} is not part of the pair", self.base_pair));
        }
        for (name, amount) in [
            ("request_amount", self.request_amount),
            ("release_amount", self.release_amount),
        ] {
            if amount <= Decimal::ZERO || !amount.fract().is_zero() {
                return Err(format!("{name} must be a positive integer, got {amount}"));
            }
        }
        if let Some(min) = self.min_settle_amount {
            if min.is_sign_negative() || !min.fract().is_zero() {
                return Err(format!("min_settle_amount must be a non-negative integer, got {min}"));
            }
        }
        if self.creation_time > self.expiration_time {
            return Err("creation_time is after expiration_time".into());
        }
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// An unsigned order valid for one day from `now`.
    pub fn dummy(
        creator: Address,
        fee_recipient: Address,
        base_pair: Asset,
        requested_asset: Asset,
        released_asset: Asset,
        request_amount: Decimal,
        release_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            creator,
            fee_recipient,
            base_pair,
            requested_asset,
            released_asset,
            request_amount,
            release_amount,
            min_settle_amount: None,
            creation_time: now,
            expiration_time: now + chrono::Duration::days(1),
            rand_nonce: 0,
            signature: None,
        }
    }
}
