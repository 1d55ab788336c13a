//! The settlement engine.
//!
//! `settle(order_a, order_b, taker_is_order_a)` validates one two-order match
//! and executes it atomically:
//!
//! ```text
//!  0. both orders structurally valid        InvalidOrderA / InvalidOrderB
//!  1. order A not expired                   OrderAExpired
//!  2. order B not expired                   OrderBExpired
//!  3. order A not cancelled                 OrderACancelled
//!  4. order B not cancelled                 OrderBCancelled
//!  5. order A has remaining                 OrderAFilled
//!  6. order B has remaining                 OrderBFilled
//!  7. orders are complementary              AssetMismatch
//!  8. seller can cover its remaining        SellerInsufficientAsset
//!  9. buyer can cover its remaining         BuyerInsufficientAsset
//! 10. order A authorized                    OrderAUnverifiable
//! 11. order B authorized                    OrderBUnverifiable
//! 12. ask <= bid                            PriceCrossViolation
//! ```
//!
//! Execution happens at the maker's (non-taker's) price. Every check runs
//! before the first mutation, so a rejected call leaves all state untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use turquaz_auth::{OrderCodec, VerifierSet};
use turquaz_ledger::{CustodyHost, InMemoryCustody, Ledger, Posting};
use turquaz_types::{
    constants, Address, Asset, EngineConfig, Order, OrderHash, OrderSide, OrderStatus, Result,
    TurquazError,
};

use crate::cancellation::CancellationRegistry;
use crate::clock::{Clock, SystemClock};
use crate::fill_tracker::FillTracker;
use crate::pricing::{self, Price};

/// Outcome of a successful settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub seller_order: OrderHash,
    pub buyer_order: OrderHash,
    pub seller: Address,
    pub buyer: Address,
    pub traded_asset: Asset,
    pub quote_asset: Asset,
    /// Side of the order flagged as taker.
    pub taker_side: OrderSide,
    /// The maker's price.
    pub execution_price: Price,
    /// Traded asset debited from the seller.
    pub fill_qty: Decimal,
    /// Quote asset debited from the buyer.
    pub quote_amount: Decimal,
    /// Cut of `fill_qty` credited to the seller order's fee recipient.
    pub traded_fee: Decimal,
    /// Cut of `quote_amount` credited to the buyer order's fee recipient.
    pub quote_fee: Decimal,
    pub settled_at: DateTime<Utc>,
}

/// One side of a match, with its identity and remaining amount resolved.
#[derive(Clone, Copy)]
struct Leg<'a> {
    order: &'a Order,
    hash: OrderHash,
    remaining: Decimal,
    is_order_a: bool,
}

/// Validates and executes two-order matches against a custodied ledger.
pub struct SettlementEngine<C: CustodyHost = InMemoryCustody> {
    config: EngineConfig,
    codec: OrderCodec,
    verifiers: VerifierSet,
    ledger: Ledger<C>,
    cancellations: CancellationRegistry,
    fills: FillTracker,
    clock: Arc<dyn Clock>,
}

impl SettlementEngine<InMemoryCustody> {
    /// An engine over a fresh in-memory custody host.
    pub fn in_memory(config: EngineConfig, verifiers: VerifierSet) -> Result<Self> {
        Self::new(config, verifiers, InMemoryCustody::new())
    }
}

impl<C: CustodyHost> SettlementEngine<C> {
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(config: EngineConfig, verifiers: VerifierSet, custody: C) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            engine_version = constants::VERSION,
            domain = %config.domain.name,
            version = %config.domain.version,
            chain_id = config.domain.chain_id,
            fee_bps = config.fee_bps,
            verifiers = verifiers.len(),
            "Settlement engine initialized"
        );
        Ok(Self {
            codec: OrderCodec::new(&config.domain),
            config,
            verifiers,
            ledger: Ledger::new(custody),
            cancellations: CancellationRegistry::new(),
            fills: FillTracker::new(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // -----------------------------------------------------------------------
    // Ledger surface
    // -----------------------------------------------------------------------

    pub fn deposit(
        &mut self,
        caller: Address,
        asset: Asset,
        amount: Decimal,
        attached_value: Decimal,
    ) -> Result<()> {
        self.ledger.deposit(caller, asset, amount, attached_value)
    }

    pub fn withdraw(&mut self, caller: Address, asset: Asset, amount: Decimal) -> Result<()> {
        self.ledger.withdraw(caller, asset, amount)
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address, asset: Asset) -> Decimal {
        self.ledger.balance_of(owner, asset)
    }

    // -----------------------------------------------------------------------
    // Order state
    // -----------------------------------------------------------------------

    /// Void every order by `caller` created at or before `cutoff`.
    pub fn force_cancel_all(&mut self, caller: Address, cutoff: DateTime<Utc>) -> DateTime<Utc> {
        let watermark = self.cancellations.force_cancel_all(caller, cutoff);
        tracing::info!(%caller, %watermark, "Force cancel watermark raised");
        watermark
    }

    #[must_use]
    pub fn is_cancelled(&self, order: &Order) -> bool {
        self.cancellations.is_cancelled(order)
    }

    #[must_use]
    pub fn order_hash(&self, order: &Order) -> OrderHash {
        self.codec.order_hash(order)
    }

    /// Unfilled part of `order`, in units of the asset it releases.
    #[must_use]
    pub fn remaining(&self, order: &Order) -> Decimal {
        self.fills.remaining(order, &self.order_hash(order))
    }

    /// Lifecycle state at the current clock time.
    ///
    /// A structurally malformed order is `Invalid` whatever its fill state.
    #[must_use]
    pub fn status(&self, order: &Order) -> OrderStatus {
        if order.check_well_formed().is_err() {
            return OrderStatus::Invalid;
        }
        let hash = self.order_hash(order);
        if self.fills.remaining(order, &hash) <= Decimal::ZERO {
            OrderStatus::FullyFilled
        } else if self.cancellations.is_cancelled(order) {
            OrderStatus::Cancelled
        } else if order.is_expired_at(self.clock.now()) {
            OrderStatus::Expired
        } else if self.fills.filled(&hash) > Decimal::ZERO {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Open
        }
    }

    // -----------------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------------

    /// Match `order_a` against `order_b`.
    ///
    /// `taker_is_order_a` names the taker; the other order is the maker and
    /// its price is the execution price.
    ///
    /// # Errors
    /// The first failing check in the order listed in the module docs.
    /// Nothing changes on error.
    pub fn settle(
        &mut self,
        order_a: &Order,
        order_b: &Order,
        taker_is_order_a: bool,
    ) -> Result<SettlementReceipt> {
        let result = self.try_settle(order_a, order_b, taker_is_order_a);
        match &result {
            Ok(receipt) => tracing::info!(
                seller_order = %receipt.seller_order,
                buyer_order = %receipt.buyer_order,
                fill_qty = %receipt.fill_qty,
                quote_amount = %receipt.quote_amount,
                price = %receipt.execution_price,
                taker = %receipt.taker_side,
                "Orders settled"
            ),
            Err(err) => tracing::debug!(code = err.code(), error = %err, "Settlement rejected"),
        }
        result
    }

    fn try_settle(
        &mut self,
        order_a: &Order,
        order_b: &Order,
        taker_is_order_a: bool,
    ) -> Result<SettlementReceipt> {
        order_a
            .check_well_formed()
            .map_err(|reason| TurquazError::InvalidOrderA { reason })?;
        order_b
            .check_well_formed()
            .map_err(|reason| TurquazError::InvalidOrderB { reason })?;

        let now = self.clock.now();
        if order_a.is_expired_at(now) {
            return Err(TurquazError::OrderAExpired);
        }
        if order_b.is_expired_at(now) {
            return Err(TurquazError::OrderBExpired);
        }
        if self.cancellations.is_cancelled(order_a) {
            return Err(TurquazError::OrderACancelled);
        }
        if self.cancellations.is_cancelled(order_b) {
            return Err(TurquazError::OrderBCancelled);
        }

        let leg_a = self.leg(order_a, true);
        let leg_b = self.leg(order_b, false);
        if leg_a.remaining <= Decimal::ZERO {
            return Err(TurquazError::OrderAFilled);
        }
        if leg_b.remaining <= Decimal::ZERO {
            return Err(TurquazError::OrderBFilled);
        }

        if order_a.released_asset != order_b.requested_asset
            || order_b.released_asset != order_a.requested_asset
            || order_a.base_pair != order_b.base_pair
        {
            return Err(TurquazError::AssetMismatch);
        }
        let (seller, buyer) = match order_a.side() {
            OrderSide::Sell => (leg_a, leg_b),
            OrderSide::Buy => (leg_b, leg_a),
        };
        let traded = seller.order.released_asset;
        let quote = buyer.order.released_asset;

        if self.ledger.balance_of(seller.order.creator, traded) < seller.remaining {
            return Err(TurquazError::SellerInsufficientAsset { asset: traded });
        }
        if self.ledger.balance_of(buyer.order.creator, quote) < buyer.remaining {
            return Err(TurquazError::BuyerInsufficientAsset { asset: quote });
        }

        self.verifiers
            .verify(order_a, &leg_a.hash)
            .map_err(|_| TurquazError::OrderAUnverifiable)?;
        self.verifiers
            .verify(order_b, &leg_b.hash)
            .map_err(|_| TurquazError::OrderBUnverifiable)?;

        let ask = Price::ask(seller.order);
        let bid = Price::bid(buyer.order);
        if !pricing::crosses(&ask, &bid)? {
            return Err(TurquazError::PriceCrossViolation);
        }

        let seller_is_taker = seller.is_order_a == taker_is_order_a;
        let execution_price = if seller_is_taker { bid } else { ask };
        let clearing = pricing::clear(&execution_price, seller.remaining, buyer.remaining)?;
        if clearing.fill_qty.is_zero() || clearing.quote_amount.is_zero() {
            return Err(TurquazError::NothingToSettle);
        }
        if self.config.enforce_min_settle_amount {
            check_min_settle(&seller, clearing.fill_qty)?;
            check_min_settle(&buyer, clearing.quote_amount)?;
        }

        let (buyer_receives, traded_fee) = pricing::fee_split(clearing.fill_qty, self.config.fee_bps)?;
        let (seller_receives, quote_fee) =
            pricing::fee_split(clearing.quote_amount, self.config.fee_bps)?;

        self.ledger.apply(&[
            Posting::debit(seller.order.creator, traded, clearing.fill_qty),
            Posting::credit(buyer.order.creator, traded, buyer_receives),
            Posting::credit(seller.order.fee_recipient, traded, traded_fee),
            Posting::debit(buyer.order.creator, quote, clearing.quote_amount),
            Posting::credit(seller.order.creator, quote, seller_receives),
            Posting::credit(buyer.order.fee_recipient, quote, quote_fee),
        ])?;
        // Both fills are capped at their leg's remaining by `clear`.
        self.fills
            .record_fill(seller.order, &seller.hash, clearing.fill_qty)?;
        self.fills
            .record_fill(buyer.order, &buyer.hash, clearing.quote_amount)?;

        Ok(SettlementReceipt {
            seller_order: seller.hash,
            buyer_order: buyer.hash,
            seller: seller.order.creator,
            buyer: buyer.order.creator,
            traded_asset: traded,
            quote_asset: quote,
            taker_side: if seller_is_taker {
                OrderSide::Sell
            } else {
                OrderSide::Buy
            },
            execution_price,
            fill_qty: clearing.fill_qty,
            quote_amount: clearing.quote_amount,
            traded_fee,
            quote_fee,
            settled_at: now,
        })
    }

    fn leg<'a>(&self, order: &'a Order, is_order_a: bool) -> Leg<'a> {
        let hash = self.codec.order_hash(order);
        Leg {
            order,
            hash,
            remaining: self.fills.remaining(order, &hash),
            is_order_a,
        }
    }

    // -----------------------------------------------------------------------
    // Invariants and accessors
    // -----------------------------------------------------------------------

    /// # Errors
    /// `SupplyInvariantViolation` if `asset` is not fully backed by custody.
    pub fn verify_solvency(&self, asset: Asset) -> Result<()> {
        self.ledger.verify_solvency(asset)
    }

    /// Solvency of every asset ever deposited.
    pub fn verify_all(&self) -> Result<()> {
        self.ledger.verify_all()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &OrderCodec {
        &self.codec
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger<C> {
        &self.ledger
    }

    /// Host-side custody access, e.g. to fund external wallets.
    pub fn custody_mut(&mut self) -> &mut C {
        self.ledger.custody_mut()
    }
}

/// A fill below the order's floor is rejected unless it exhausts the order.
fn check_min_settle(leg: &Leg<'_>, fill: Decimal) -> Result<()> {
    match leg.order.min_settle_amount {
        Some(minimum) if fill < minimum && fill < leg.remaining => {
            Err(TurquazError::BelowMinSettleAmount { fill, minimum })
        }
        _ => Ok(()),
    }
}
