//! Order authentication.
//!
//! Verification is polymorphic over [`OrderVerifier`] strategies. The
//! settlement engine only asks "does some strategy authorize this order hash
//! for this creator"; new strategies plug into a [`VerifierSet`] without
//! touching settlement code.
//!
//! Two strategies ship with the crate:
//! - [`DirectSignatureVerifier`]: the creator address is an ed25519 key and
//!   the order carries a valid signature over the order hash.
//! - [`DelegatedVerifier`]: the creator is a registered [`DelegatedSigner`]
//!   that endorses the order hash.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ed25519_dalek::VerifyingKey;
use turquaz_types::{Address, Order, OrderHash, Result, TurquazError};

use crate::agents::DelegatedSigner;

/// A strategy deciding whether an identity authorized an order hash.
pub trait OrderVerifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// `true` if `order.creator` authorized `order_hash`.
    fn authorizes(&self, order: &Order, order_hash: &OrderHash) -> bool;
}

// ---------------------------------------------------------------------------
// DirectSignatureVerifier
// ---------------------------------------------------------------------------

/// Ed25519 signature over the domain-separated order hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSignatureVerifier;

impl OrderVerifier for DirectSignatureVerifier {
    fn name(&self) -> &'static str {
        "direct-ed25519"
    }

    fn authorizes(&self, order: &Order, order_hash: &OrderHash) -> bool {
        let Some(signature) = order.signature.as_ref() else {
            return false;
        };
        let Ok(key) = VerifyingKey::from_bytes(order.creator.as_bytes()) else {
            return false;
        };
        key.verify_strict(order_hash.as_bytes(), signature).is_ok()
    }
}

// ---------------------------------------------------------------------------
// DelegatedVerifier
// ---------------------------------------------------------------------------

/// Asks the creator's registered agent whether it endorses the hash.
#[derive(Default)]
pub struct DelegatedVerifier {
    agents: HashMap<Address, Arc<dyn DelegatedSigner>>,
}

impl DelegatedVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` as the endorsement oracle for `address`.
    /// Replaces any previous registration.
    pub fn register(&mut self, address: Address, agent: Arc<dyn DelegatedSigner>) {
        self.agents.insert(address, agent);
    }

    #[must_use]
    pub fn is_registered(&self, address: &Address) -> bool {
        self.agents.contains_key(address)
    }
}

impl fmt::Debug for DelegatedVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedVerifier")
            .field("agents", &self.agents.len())
            .finish()
    }
}

impl OrderVerifier for DelegatedVerifier {
    fn name(&self) -> &'static str {
        "delegated"
    }

    fn authorizes(&self, order: &Order, order_hash: &OrderHash) -> bool {
        self.agents
            .get(&order.creator)
            .is_some_and(|agent| agent.endorses(order_hash))
    }
}

// ---------------------------------------------------------------------------
// VerifierSet
// ---------------------------------------------------------------------------

/// An ordered set of strategies; the first one that authorizes wins.
#[derive(Default)]
pub struct VerifierSet {
    strategies: Vec<Box<dyn OrderVerifier>>,
}

impl VerifierSet {
    /// An empty set that authorizes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct signatures first, then the given delegated agents.
    #[must_use]
    pub fn standard(delegated: DelegatedVerifier) -> Self {
        Self::new()
            .with(Box::new(DirectSignatureVerifier))
            .with(Box::new(delegated))
    }

    #[must_use]
    pub fn with(mut self, strategy: Box<dyn OrderVerifier>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn push(&mut self, strategy: Box<dyn OrderVerifier>) {
        self.strategies.push(strategy);
    }

    /// # Errors
    /// `UnverifiableOrder` if no strategy authorizes the hash.
    pub fn verify(&self, order: &Order, order_hash: &OrderHash) -> Result<()> {
        if let Some(strategy) = self
            .strategies
            .iter()
            .find(|s| s.authorizes(order, order_hash))
        {
            tracing::trace!(
                order = %order_hash,
                creator = %order.creator,
                strategy = strategy.name(),
                "Order authorized"
            );
            return Ok(());
        }
        Err(TurquazError::UnverifiableOrder {
            creator: order.creator,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for VerifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.iter().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::EndorsementBook;
    use crate::codec::OrderCodec;
    use crate::test_helpers::TestWallet;
    use rust_decimal::Decimal;
    use turquaz_types::{Asset, DomainConfig};

    fn unsigned(creator: Address) -> Order {
        Order::dummy(
            creator,
            Address([2u8; 32]),
            Asset([3u8; 32]),
            Asset([3u8; 32]),
            Asset([4u8; 32]),
            Decimal::new(1000, 0),
            Decimal::new(100, 0),
        )
    }

    fn codec() -> OrderCodec {
        OrderCodec::new(&DomainConfig::default())
    }

    #[test]
    fn direct_signature_verifies() {
        let wallet = TestWallet::from_seed(1);
        let codec = codec();
        let order = wallet.sign(&codec, unsigned(wallet.address()));
        let hash = codec.order_hash(&order);
        assert!(DirectSignatureVerifier.authorizes(&order, &hash));
    }

    #[test]
    fn direct_signature_rejects_other_signer() {
        let alice = TestWallet::from_seed(1);
        let mallory = TestWallet::from_seed(2);
        let codec = codec();
        let order = mallory.sign(&codec, unsigned(alice.address()));
        let hash = codec.order_hash(&order);
        assert!(!DirectSignatureVerifier.authorizes(&order, &hash));
    }

    #[test]
    fn mutation_after_signing_invalidates() {
        let wallet = TestWallet::from_seed(1);
        let codec = codec();
        let mut order = wallet.sign(&codec, unsigned(wallet.address()));
        order.release_amount = Decimal::new(101, 0);
        let hash = codec.order_hash(&order);
        assert!(!DirectSignatureVerifier.authorizes(&order, &hash));
    }

    #[test]
    fn signature_from_other_domain_rejected() {
        let wallet = TestWallet::from_seed(1);
        let foreign = OrderCodec::new(&DomainConfig {
            chain_id: 1,
            ..DomainConfig::default()
        });
        let order = wallet.sign(&foreign, unsigned(wallet.address()));
        let hash = codec().order_hash(&order);
        assert!(!DirectSignatureVerifier.authorizes(&order, &hash));
    }

    #[test]
    fn missing_signature_rejected() {
        let wallet = TestWallet::from_seed(1);
        let order = unsigned(wallet.address());
        let hash = codec().order_hash(&order);
        assert!(!DirectSignatureVerifier.authorizes(&order, &hash));
    }

    #[test]
    fn delegated_agent_endorsement() {
        let agent_addr = Address([0xaa; 32]);
        let book = Arc::new(EndorsementBook::new());
        let mut delegated = DelegatedVerifier::new();
        delegated.register(agent_addr, book.clone());

        let order = unsigned(agent_addr);
        let hash = codec().order_hash(&order);
        assert!(!delegated.authorizes(&order, &hash));

        book.endorse(hash);
        assert!(delegated.authorizes(&order, &hash));
        assert!(delegated.is_registered(&agent_addr));
    }

    #[test]
    fn delegated_ignores_unregistered_creator() {
        let delegated = DelegatedVerifier::new();
        let order = unsigned(Address([0xbb; 32]));
        let hash = codec().order_hash(&order);
        assert!(!delegated.authorizes(&order, &hash));
    }

    #[test]
    fn verifier_set_tries_every_strategy() {
        let agent_addr = Address([0xaa; 32]);
        let book = Arc::new(EndorsementBook::new());
        let mut delegated = DelegatedVerifier::new();
        delegated.register(agent_addr, book.clone());
        let set = VerifierSet::standard(delegated);
        assert_eq!(set.len(), 2);

        let codec = codec();
        let wallet = TestWallet::from_seed(3);
        let signed = wallet.sign(&codec, unsigned(wallet.address()));
        assert!(set.verify(&signed, &codec.order_hash(&signed)).is_ok());

        let agent_order = unsigned(agent_addr);
        let agent_hash = codec.order_hash(&agent_order);
        let err = set.verify(&agent_order, &agent_hash).unwrap_err();
        assert!(matches!(err, TurquazError::UnverifiableOrder { creator } if creator == agent_addr));

        book.endorse(agent_hash);
        assert!(set.verify(&agent_order, &agent_hash).is_ok());
    }

    #[test]
    fn empty_set_authorizes_nothing() {
        let wallet = TestWallet::from_seed(4);
        let codec = codec();
        let signed = wallet.sign(&codec, unsigned(wallet.address()));
        assert!(VerifierSet::new().verify(&signed, &codec.order_hash(&signed)).is_err());
    }
}
