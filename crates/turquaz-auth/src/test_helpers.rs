//! Deterministic signing fixtures. **Never use in production.**

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer, SigningKey};
use rust_decimal::Decimal;
use turquaz_types::{Address, Asset, Order};

use crate::codec::OrderCodec;

/// An end-user wallet holding an ed25519 signing key.
#[derive(Debug, Clone)]
pub struct TestWallet {
    key: SigningKey,
}

impl TestWallet {
    /// A wallet whose secret key is `[seed; 32]`.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        Self {
            key: SigningKey::from_bytes(&[seed; 32]),
        }
    }

    /// A wallet with a fresh random key.
    #[must_use]
    pub fn random() -> Self {
        Self {
            key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// The wallet's address: its verifying key bytes.
    #[must_use]
    pub fn address(&self) -> Address {
        Address(self.key.verifying_key().to_bytes())
    }

    /// Sign `order` for the codec's domain, replacing any existing signature.
    #[must_use]
    pub fn sign(&self, codec: &OrderCodec, mut order: Order) -> Order {
        let hash = codec.order_hash(&order);
        order.signature = Some(self.key.sign(hash.as_bytes()));
        order
    }
}

/// Builds orders for a (traded, quote) pair.
///
/// Starts from an unsigned order valid for one day with nonce 0.
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    order: Order,
}

impl OrderBuilder {
    /// Offer `traded_amount` of `traded` for `quote_amount` of `quote`.
    #[must_use]
    pub fn sell(
        creator: Address,
        fee_recipient: Address,
        traded: Asset,
        quote: Asset,
        traded_amount: i64,
        quote_amount: i64,
    ) -> Self {
        Self {
            order: Order::dummy(
                creator,
                fee_recipient,
                quote,
                quote,
                traded,
                Decimal::new(quote_amount, 0),
                Decimal::new(traded_amount, 0),
            ),
        }
    }

    /// Offer `quote_amount` of `quote` for `traded_amount` of `traded`.
    #[must_use]
    pub fn buy(
        creator: Address,
        fee_recipient: Address,
        traded: Asset,
        quote: Asset,
        traded_amount: i64,
        quote_amount: i64,
    ) -> Self {
        Self {
            order: Order::dummy(
                creator,
                fee_recipient,
                quote,
                traded,
                quote,
                Decimal::new(traded_amount, 0),
                Decimal::new(quote_amount, 0),
            ),
        }
    }

    #[must_use]
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.order.rand_nonce = nonce;
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.order.creation_time = at;
        self
    }

    #[must_use]
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.order.expiration_time = at;
        self
    }

    #[must_use]
    pub fn min_settle(mut self, min: i64) -> Self {
        self.order.min_settle_amount = Some(Decimal::new(min, 0));
        self
    }

    /// The unsigned order.
    #[must_use]
    pub fn build(self) -> Order {
        self.order
    }

    #[must_use]
    pub fn signed_by(self, wallet: &TestWallet, codec: &OrderCodec) -> Order {
        wallet.sign(codec, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turquaz_types::{DomainConfig, OrderSide};

    #[test]
    fn seeded_wallets_are_stable() {
        assert_eq!(TestWallet::from_seed(7).address(), TestWallet::from_seed(7).address());
        assert_ne!(TestWallet::from_seed(7).address(), TestWallet::from_seed(8).address());
    }

    #[test]
    fn random_wallets_differ() {
        assert_ne!(TestWallet::random().address(), TestWallet::random().address());
    }

    #[test]
    fn builder_sides() {
        let x = Asset([1u8; 32]);
        let y = Asset([2u8; 32]);
        let w = TestWallet::from_seed(1);
        let sell = OrderBuilder::sell(w.address(), Address::ZERO, x, y, 100, 1000).build();
        assert_eq!(sell.side(), OrderSide::Sell);
        assert_eq!(sell.release_amount, Decimal::new(100, 0));
        let buy = OrderBuilder::buy(w.address(), Address::ZERO, x, y, 100, 1000).build();
        assert_eq!(buy.side(), OrderSide::Buy);
        assert_eq!(buy.release_amount, Decimal::new(1000, 0));
        assert!(sell.check_well_formed().is_ok());
        assert!(buy.check_well_formed().is_ok());
    }

    #[test]
    fn signed_by_attaches_signature() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let w = TestWallet::from_seed(1);
        let o = OrderBuilder::sell(w.address(), Address::ZERO, Asset([1u8; 32]), Asset([2u8; 32]), 1, 1)
            .nonce(9)
            .signed_by(&w, &codec);
        assert!(o.signature.is_some());
        assert_eq!(o.rand_nonce, 9);
    }
}
