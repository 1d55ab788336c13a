//! Implied prices, clearing arithmetic and fee extraction.
//!
//! Prices are kept as exact ratios of quote units per traded unit and are
//! compared by cross-multiplication, so no precision is lost before the
//! final truncation of each transferred amount.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use turquaz_types::constants::BPS_DENOMINATOR;
use turquaz_types::{Order, Result, TurquazError};

/// `quote` units of the quote asset per `base` units of the traded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub quote: Decimal,
    pub base: Decimal,
}

impl Price {
    /// The ask of an order releasing the traded asset.
    #[must_use]
    pub fn ask(seller: &Order) -> Self {
        Self {
            quote: seller.request_amount,
            base: seller.release_amount,
        }
    }

    /// The bid of an order releasing the quote asset.
    #[must_use]
    pub fn bid(buyer: &Order) -> Self {
        Self {
            quote: buyer.release_amount,
            base: buyer.request_amount,
        }
    }

    /// Compare two ratios exactly by cross-multiplying in 256 bits.
    pub fn cmp_ratio(&self, other: &Self) -> Result<Ordering> {
        let lhs = widening_mul(to_units(self.quote)?, to_units(other.base)?);
        let rhs = widening_mul(to_units(other.quote)?, to_units(self.base)?);
        Ok(lhs.cmp(&rhs))
    }

    /// Approximate decimal value, for display and receipts.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        self.quote.checked_div(self.base).unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.quote, self.base)
    }
}

/// `true` if the ask does not exceed the bid.
pub fn crosses(ask: &Price, bid: &Price) -> Result<bool> {
    Ok(ask.cmp_ratio(bid)? != Ordering::Greater)
}

/// `floor(a * b / c)` for non-negative integral operands.
///
/// Exact: the product is formed in 256 bits and divided bit by bit, so a
/// quotient just below an integer is never rounded up to it.
pub fn mul_div_floor(a: Decimal, b: Decimal, c: Decimal) -> Result<Decimal> {
    let (a, b, c) = (to_units(a)?, to_units(b)?, to_units(c)?);
    if c == 0 {
        return Err(TurquazError::ArithmeticOverflow);
    }
    let (hi, lo) = widening_mul(a, b);
    let quotient = div_wide(hi, lo, c).ok_or(TurquazError::ArithmeticOverflow)?;
    i128::try_from(quotient)
        .ok()
        .and_then(|q| Decimal::try_from_i128_with_scale(q, 0).ok())
        .ok_or(TurquazError::ArithmeticOverflow)
}

fn to_units(value: Decimal) -> Result<u128> {
    let whole = value.trunc().normalize();
    u128::try_from(whole.mantissa()).map_err(|_| TurquazError::InvalidAmount(value))
}

/// Full 256-bit product as `(high, low)` halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let mid = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let lo = (lo_lo & MASK) | (mid << 64);
    let hi = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (mid >> 64);
    (hi, lo)
}

/// Floor of `(hi, lo) / divisor`, or `None` if it does not fit in 128 bits.
fn div_wide(hi: u128, lo: u128, divisor: u128) -> Option<u128> {
    if hi >= divisor {
        return None;
    }
    let mut rem = hi;
    let mut quot = 0u128;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        quot <<= 1;
        if carry == 1 || rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            quot |= 1;
        }
    }
    Some(quot)
}

/// Quantities moved by one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clearing {
    /// Traded asset, seller to buyer.
    pub fill_qty: Decimal,
    /// Quote asset, buyer to seller.
    pub quote_amount: Decimal,
}

/// Clear the seller's and buyer's remaining amounts at `price`.
///
/// `fill_qty = min(seller_remaining, floor(buyer_remaining / price))`,
/// `quote_amount = min(floor(fill_qty * price), buyer_remaining)`.
pub fn clear(price: &Price, seller_remaining: Decimal, buyer_remaining: Decimal) -> Result<Clearing> {
    let affordable = mul_div_floor(buyer_remaining, price.base, price.quote)?;
    let fill_qty = seller_remaining.min(affordable);
    let quote_amount = mul_div_floor(fill_qty, price.quote, price.base)?.min(buyer_remaining);
    Ok(Clearing {
        fill_qty,
        quote_amount,
    })
}

/// Split `amount` into `(net, fee)` with `fee = floor(amount * fee_bps / 10_000)`.
pub fn fee_split(amount: Decimal, fee_bps: u32) -> Result<(Decimal, Decimal)> {
    let fee = mul_div_floor(
        amount,
        Decimal::from(fee_bps),
        Decimal::from(BPS_DENOMINATOR),
    )?;
    Ok((amount - fee, fee))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn price(quote: i64, base: i64) -> Price {
        Price {
            quote: d(quote),
            base: d(base),
        }
    }

    #[test]
    fn equal_prices_cross() {
        assert!(crosses(&price(1000, 100), &price(1000, 100)).unwrap());
        assert!(crosses(&price(800, 100), &price(1000, 100)).unwrap());
    }

    #[test]
    fn ask_above_bid_does_not_cross() {
        // 27 for 9 is 3.0; 20 for 10 is 2.0.
        assert!(!crosses(&price(27, 9), &price(20, 10)).unwrap());
    }

    #[test]
    fn cross_products_beyond_decimal_range_compare_exactly() {
        let big = Price {
            quote: Decimal::MAX,
            base: d(2),
        };
        let bigger = Price {
            quote: Decimal::MAX,
            base: d(1),
        };
        assert!(crosses(&big, &bigger).unwrap());
        assert!(!crosses(&bigger, &big).unwrap());

        let just_below = Price {
            quote: Decimal::MAX - Decimal::ONE,
            base: Decimal::MAX,
        };
        let one = Price {
            quote: Decimal::MAX,
            base: Decimal::MAX,
        };
        assert_eq!(just_below.cmp_ratio(&one).unwrap(), Ordering::Less);
    }

    #[test]
    fn mul_div_truncates() {
        assert_eq!(mul_div_floor(d(10), d(7), d(3)).unwrap(), d(23));
        assert_eq!(mul_div_floor(d(0), d(7), d(3)).unwrap(), d(0));
        assert!(mul_div_floor(d(1), d(1), d(0)).is_err());
    }

    #[test]
    fn mul_div_survives_large_products() {
        let a = d(1_000_000_000_000_000);
        assert!(a.checked_mul(a).is_none());
        assert_eq!(mul_div_floor(a, a, a).unwrap(), a);
        assert_eq!(
            mul_div_floor(Decimal::MAX, Decimal::MAX, Decimal::MAX).unwrap(),
            Decimal::MAX
        );
        assert!(mul_div_floor(Decimal::MAX, d(2), d(1)).is_err());
    }

    #[test]
    fn mul_div_never_rounds_up_near_an_integer() {
        // 3e28 - 1 over 3e19 is 999_999_999.99999999996..., which a
        // 28-digit division would round to 1e9.
        let budget = Decimal::from_i128_with_scale(30_000_000_000_000_000_000_000_000_000 - 1, 0);
        let quote = Decimal::from_i128_with_scale(30_000_000_000_000_000_000, 0);
        assert_eq!(mul_div_floor(budget, d(1), quote).unwrap(), d(999_999_999));
    }

    #[test]
    fn clear_at_the_top_of_the_range_stays_affordable() {
        let budget = Decimal::from_i128_with_scale(30_000_000_000_000_000_000_000_000_000 - 1, 0);
        let p = Price {
            quote: Decimal::from_i128_with_scale(30_000_000_000_000_000_000, 0),
            base: d(1),
        };
        let c = clear(&p, d(2_000_000_000), budget).unwrap();
        assert_eq!(c.fill_qty, d(999_999_999));
        assert_eq!(
            c.quote_amount,
            Decimal::from_i128_with_scale(29_999_999_970_000_000_000_000_000_000, 0)
        );
        assert!(c.quote_amount <= budget);
    }

    #[test]
    fn mul_div_rejects_negative_operands() {
        assert!(matches!(
            mul_div_floor(d(-1), d(1), d(1)),
            Err(TurquazError::InvalidAmount(_))
        ));
    }

    #[test]
    fn clear_full_match() {
        let c = clear(&price(1000, 100), d(100), d(1000)).unwrap();
        assert_eq!(c.fill_qty, d(100));
        assert_eq!(c.quote_amount, d(1000));
    }

    #[test]
    fn clear_limited_by_buyer_budget() {
        // Buyer has 1000 quote left at 10/unit; seller offers 200.
        let c = clear(&price(2000, 200), d(200), d(1000)).unwrap();
        assert_eq!(c.fill_qty, d(100));
        assert_eq!(c.quote_amount, d(1000));
    }

    #[test]
    fn clear_at_maker_ask_gives_buyer_improvement() {
        let c = clear(&price(800, 100), d(100), d(1000)).unwrap();
        assert_eq!(c.fill_qty, d(100));
        assert_eq!(c.quote_amount, d(800));
    }

    #[test]
    fn clear_truncates_fractional_units() {
        let c = clear(&price(3, 1), d(10), d(10)).unwrap();
        assert_eq!(c.fill_qty, d(3));
        assert_eq!(c.quote_amount, d(9));
    }

    #[test]
    fn fee_is_one_percent_by_default() {
        assert_eq!(fee_split(d(100), 100).unwrap(), (d(99), d(1)));
        assert_eq!(fee_split(d(1000), 100).unwrap(), (d(990), d(10)));
        assert_eq!(fee_split(d(50), 100).unwrap(), (d(50), d(0)));
        assert_eq!(fee_split(d(1000), 0).unwrap(), (d(1000), d(0)));
    }

    #[test]
    fn price_display() {
        assert_eq!(price(27, 9).to_string(), "27/9");
        assert_eq!(price(27, 9).to_decimal(), d(3));
    }
}
