//! # turquaz-auth
//!
//! **Order identity and authentication**: everything needed to decide
//! whether an order really comes from its creator.
//!
//! ## Architecture
//!
//! 1. **OrderCodec**: canonical encoding of an order's signable fields and
//!    its domain-separated identity ([`OrderHash`](turquaz_types::OrderHash))
//! 2. **OrderVerifier**: pluggable authentication strategy
//! 3. **DirectSignatureVerifier**: ed25519 signature by the creator's key
//! 4. **DelegatedVerifier**: endorsement by a registered [`DelegatedSigner`]
//! 5. **VerifierSet**: first strategy that authorizes wins
//!
//! ## Signing Flow
//!
//! ```text
//! Wallet: order → OrderCodec.order_hash() → sign(hash) → Order { signature }
//! Engine: order → OrderCodec.order_hash() → VerifierSet.verify(order, hash)
//! ```

pub mod agents;
pub mod codec;
pub mod verifier;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use agents::{DelegatedSigner, EndorsementBook};
pub use codec::OrderCodec;
pub use verifier::{DelegatedVerifier, DirectSignatureVerifier, OrderVerifier, VerifierSet};
