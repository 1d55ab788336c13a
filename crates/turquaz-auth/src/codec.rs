//! Canonical order encoding and domain-separated order identity.
//!
//! ```text
//! domain_separator = SHA-256("turquaz:domain:v1:" || name || version || chain_id || engine_address)
//! struct_hash      = SHA-256("turquaz:order:v1:"  || canonical(order))
//! order_hash       = SHA-256(0x19 || 0x01 || domain_separator || struct_hash)
//! ```
//!
//! `canonical(order)` writes every signable field in a fixed order; variable
//! width fields are length-prefixed and the optional minimum settle amount
//! carries a presence byte. The signature is never part of the encoding.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use turquaz_types::{DomainConfig, Order, OrderHash};

const DOMAIN_TAG: &[u8] = b"turquaz:domain:v1:";
const ORDER_TAG: &[u8] = b"turquaz:order:v1:";
const HASH_PREFIX: [u8; 2] = [0x19, 0x01];

/// Computes order identities for one signing domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCodec {
    domain_separator: [u8; 32],
}

impl OrderCodec {
    #[must_use]
    pub fn new(domain: &DomainConfig) -> Self {
        Self {
            domain_separator: Self::compute_domain_separator(domain),
        }
    }

    fn compute_domain_separator(domain: &DomainConfig) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        write_bytes(&mut hasher, domain.name.as_bytes());
        write_bytes(&mut hasher, domain.version.as_bytes());
        hasher.update(domain.chain_id.to_be_bytes());
        hasher.update(domain.engine_address.as_bytes());
        hasher.finalize().into()
    }

    #[must_use]
    pub fn domain_separator(&self) -> &[u8; 32] {
        &self.domain_separator
    }

    /// Canonical byte encoding of the order's signable fields.
    #[must_use]
    pub fn encode(order: &Order) -> Vec<u8> {
        let mut out = Vec::with_capacity(320);
        out.extend_from_slice(order.creator.as_bytes());
        out.extend_from_slice(order.fee_recipient.as_bytes());
        out.extend_from_slice(order.base_pair.as_bytes());
        out.extend_from_slice(order.requested_asset.as_bytes());
        out.extend_from_slice(order.released_asset.as_bytes());
        push_amount(&mut out, order.request_amount);
        push_amount(&mut out, order.release_amount);
        match order.min_settle_amount {
            Some(min) => {
                out.push(1);
                push_amount(&mut out, min);
            }
            None => out.push(0),
        }
        push_time(&mut out, order.creation_time);
        push_time(&mut out, order.expiration_time);
        out.extend_from_slice(&order.rand_nonce.to_be_bytes());
        out
    }

    /// Domain-independent hash of the encoded order.
    #[must_use]
    pub fn struct_hash(order: &Order) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(ORDER_TAG);
        hasher.update(Self::encode(order));
        hasher.finalize().into()
    }

    /// The order's identity within this domain.
    #[must_use]
    pub fn order_hash(&self, order: &Order) -> OrderHash {
        let mut hasher = Sha256::new();
        hasher.update(HASH_PREFIX);
        hasher.update(self.domain_separator);
        hasher.update(Self::struct_hash(order));
        OrderHash(hasher.finalize().into())
    }
}

fn write_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    // Lengths of domain strings are tiny; saturate rather than wrap.
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(bytes);
}

/// Amounts are written normalized so `100` and `100.00` encode identically.
fn push_amount(out: &mut Vec<u8>, amount: Decimal) {
    let text = amount.normalize().to_string();
    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(text.as_bytes());
}

/// Full-precision timestamp: seconds, then sub-second nanos.
fn push_time(out: &mut Vec<u8>, at: DateTime<Utc>) {
    out.extend_from_slice(&at.timestamp().to_be_bytes());
    out.extend_from_slice(&at.timestamp_subsec_nanos().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use turquaz_types::{Address, Asset};

    fn order() -> Order {
        Order::dummy(
            Address([1u8; 32]),
            Address([2u8; 32]),
            Asset([3u8; 32]),
            Asset([3u8; 32]),
            Asset([4u8; 32]),
            Decimal::new(1000, 0),
            Decimal::new(100, 0),
        )
    }

    #[test]
    fn hash_is_deterministic() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let o = order();
        assert_eq!(codec.order_hash(&o), codec.order_hash(&o.clone()));
    }

    #[test]
    fn nonce_distinguishes_identical_orders() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let a = order();
        let mut b = a.clone();
        b.rand_nonce = 1;
        assert_ne!(codec.order_hash(&a), codec.order_hash(&b));
    }

    #[test]
    fn signature_is_not_part_of_identity() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let a = order();
        let mut b = a.clone();
        b.signature = Some(ed25519_dalek::Signature::from_bytes(&[7u8; 64]));
        assert_eq!(codec.order_hash(&a), codec.order_hash(&b));
    }

    #[test]
    fn amount_scale_does_not_change_identity() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let a = order();
        let mut b = a.clone();
        b.request_amount = Decimal::new(100_000, 2);
        assert_eq!(codec.order_hash(&a), codec.order_hash(&b));
    }

    #[test]
    fn min_settle_presence_changes_identity() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let a = order();
        let mut b = a.clone();
        b.min_settle_amount = Some(Decimal::ZERO);
        assert_ne!(codec.order_hash(&a), codec.order_hash(&b));
    }

    #[test]
    fn sub_millisecond_time_changes_identity() {
        let codec = OrderCodec::new(&DomainConfig::default());
        let a = order();
        let mut created = a.clone();
        created.creation_time += chrono::Duration::microseconds(1);
        let mut expires = a.clone();
        expires.expiration_time += chrono::Duration::nanoseconds(1);
        assert_ne!(codec.order_hash(&a), codec.order_hash(&created));
        assert_ne!(codec.order_hash(&a), codec.order_hash(&expires));
        assert_ne!(codec.order_hash(&created), codec.order_hash(&expires));
    }

    #[test]
    fn every_domain_field_separates() {
        let base = DomainConfig::default();
        let o = order();
        let reference = OrderCodec::new(&base).order_hash(&o);

        let variants = [
            DomainConfig { name: "Other".into(), ..base.clone() },
            DomainConfig { version: "0.2".into(), ..base.clone() },
            DomainConfig { chain_id: 1, ..base.clone() },
            DomainConfig { engine_address: Address([9u8; 32]), ..base.clone() },
        ];
        for domain in variants {
            assert_ne!(OrderCodec::new(&domain).order_hash(&o), reference);
        }
    }

    #[test]
    fn length_prefix_prevents_field_shifting() {
        let a = DomainConfig { name: "ab".into(), version: "c".into(), ..DomainConfig::default() };
        let b = DomainConfig { name: "a".into(), version: "bc".into(), ..DomainConfig::default() };
        assert_ne!(OrderCodec::new(&a).domain_separator(), OrderCodec::new(&b).domain_separator());
    }
}
