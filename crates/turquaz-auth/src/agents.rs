//! Delegated signer agents.
//!
//! A delegated agent is an identity that cannot produce signatures itself
//! (a managed custody account, a contract wallet) but can be asked whether
//! it currently endorses a given order hash. The engine trusts a positive
//! answer without further checks.

use std::collections::HashSet;

use parking_lot::RwLock;
use turquaz_types::OrderHash;

/// The query every delegated creator must answer.
pub trait DelegatedSigner: Send + Sync {
    /// Does this agent currently endorse the order with this identity?
    fn endorses(&self, order_hash: &OrderHash) -> bool;
}

/// An in-memory agent that endorses exactly the hashes it was told to.
///
/// Endorsements may be revoked, after which the engine stops accepting
/// the order even though its fields are unchanged.
#[derive(Debug, Default)]
pub struct EndorsementBook {
    endorsed: RwLock<HashSet<OrderHash>>,
}

impl EndorsementBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start endorsing `order_hash`. Returns `false` if already endorsed.
    pub fn endorse(&self, order_hash: OrderHash) -> bool {
        self.endorsed.write().insert(order_hash)
    }

    /// Stop endorsing `order_hash`. Returns `false` if it was not endorsed.
    pub fn revoke(&self, order_hash: &OrderHash) -> bool {
        self.endorsed.write().remove(order_hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endorsed.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endorsed.read().is_empty()
    }
}

impl DelegatedSigner for EndorsementBook {
    fn endorses(&self, order_hash: &OrderHash) -> bool {
        self.endorsed.read().contains(order_hash)
    }
}
