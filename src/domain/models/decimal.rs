//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the fixed-point decimal type used for every price and quantity
// in the matching engine. It stores three implicit fractional digits as a scaled i64 so
// that equality, ordering, and arithmetic are exact — no floating-point comparisons ever
// leak into a matching decision.
//
// | Component | Description                                                          |
// |-----------|-----------------------------------------------------------------------|
// | Amount    | Fixed-point decimal, 3 implicit fractional digits, backed by i64.     |
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name        | Description                                      | Return Type   |
// |-------------|--------------------------------------------------|---------------|
// | from_i64    | Builds an Amount from a whole-unit integer        | Amount        |
// | from_scaled | Builds an Amount from an already-scaled raw value | Amount        |
// | checked_add | Adds two amounts, erroring on overflow            | Option<Amount>|
// | checked_sub | Subtracts, erroring on underflow                  | Option<Amount>|
// | checked_mul | Multiplies by a raw (unscaled) integer factor     | Option<Amount>|
// | is_zero     | Equal-to-zero test                                | bool          |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of implicit fractional digits carried by every `Amount`.
pub const SCALE: i64 = 1_000;

/// A fixed-point decimal with exactly three fractional digits, backed by a scaled `i64`.
///
/// Used for both prices and quantities throughout the core. Equality and ordering are
/// exact integer comparisons on the scaled representation; there is no float anywhere
/// in this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Builds an `Amount` from a whole-unit integer (e.g. `Amount::from_i64(100)` is `100.000`).
    #[inline]
    pub fn from_i64(whole: i64) -> Self {
        Amount(whole * SCALE)
    }

    /// Builds an `Amount` directly from its scaled raw value (e.g. `150_500` is `150.500`).
    #[inline]
    pub fn from_scaled(raw: i64) -> Self {
        Amount(raw)
    }

    /// Returns the underlying scaled integer.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    #[inline]
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Multiplies by a raw (unscaled) integer factor, e.g. a quantity expressed in
    /// the same fixed-point representation: `price.checked_mul_scaled(qty)` computes
    /// `price * qty` with the single implied scale of the result divided back out.
    #[inline]
    pub fn checked_mul_scaled(&self, other: Amount) -> Option<Amount> {
        let product = (self.0 as i128).checked_mul(other.0 as i128)?;
        let scaled = product / SCALE as i128;
        if scaled > i64::MAX as i128 || scaled < i64::MIN as i128 {
            None
        } else {
            Some(Amount(scaled as i64))
        }
    }

    #[inline]
    pub fn min(self, other: Amount) -> Amount {
        if self <= other { self } else { other }
    }
}

impl fmt::Display for Amount {
    /// Always emits at least three fractional digits, matching the execution-report
    /// serialization contract (§6.2).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / SCALE as u64;
        let frac = magnitude % SCALE as u64;
        if negative {
            write!(f, "-{}.{:03}", whole, frac)
        } else {
            write!(f, "{}.{:03}", whole, frac)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_three_fractional_digits() {
        assert_eq!(Amount::from_i64(10).to_string(), "10.000");
        assert_eq!(Amount::from_scaled(100_500).to_string(), "100.500");
        assert_eq!(Amount::from_scaled(5).to_string(), "0.005");
    }

    #[test]
    fn ordering_is_exact() {
        let a = Amount::from_scaled(100_000);
        let b = Amount::from_scaled(100_001);
        assert!(a < b);
        assert!(b > a);
        assert_eq!(a, Amount::from_scaled(100_000));
    }

    #[test]
    fn add_sub_are_exact() {
        let a = Amount::from_i64(10);
        let b = Amount::from_i64(3);
        assert_eq!(a.checked_add(b), Some(Amount::from_i64(13)));
        assert_eq!(a.checked_sub(b), Some(Amount::from_i64(7)));
    }

    #[test]
    fn mul_divides_out_the_shared_scale() {
        let price = Amount::from_i64(100);
        let qty = Amount::from_i64(10);
        assert_eq!(price.checked_mul_scaled(qty), Some(Amount::from_i64(1000)));
    }

    #[test]
    fn is_zero_detects_exact_zero_only() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::from_scaled(1).is_zero());
    }
}
