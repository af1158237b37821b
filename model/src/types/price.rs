// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2023 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sextant_core::{correctness::FAILED, parsing::precision_from_str};

use super::fixed::{check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64, FIXED_PRECISION};
use crate::types::quantity::Quantity;

/// The maximum valid price value which can be represented.
pub const PRICE_MAX: f64 = 9_223_372_036.0;

/// The minimum valid price value which can be represented.
pub const PRICE_MIN: f64 = -9_223_372_036.0;

/// Represents a price in a market.
///
/// Backed by a raw 64-bit integer scaled to 9 decimal places, with an
/// explicit `precision` for parsing and display. Equality and ordering
/// compare the raw backing, so prices of differing precision compare at
/// matched scale.
#[repr(C)]
#[derive(Clone, Copy, Default, Eq)]
pub struct Price {
    /// The raw fixed-point value, scaled to `FIXED_PRECISION`.
    pub raw: i64,
    /// The display precision in decimal places.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] from the given `f64`, rounding half-to-even
    /// at the given `precision`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is out of range or non-finite, or if
    /// `precision` exceeds the fixed-point maximum.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        if !value.is_finite() {
            anyhow::bail!("`value` was not finite, was {value}")
        }
        if !(PRICE_MIN..=PRICE_MAX).contains(&value) {
            anyhow::bail!("`value` exceeded valid range [{PRICE_MIN}, {PRICE_MAX}], was {value}")
        }
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] from the given `f64`.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Price::new_checked`]).
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] from the given raw fixed-point value.
    #[must_use]
    pub fn from_raw(raw: i64, precision: u8) -> Self {
        check_fixed_precision(precision).expect(FAILED);
        Self { raw, precision }
    }

    /// Creates a new [`Price`] with a value of zero at the given precision.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self::from_raw(0, precision)
    }

    /// Creates a new [`Price`] with the maximum representable value.
    #[must_use]
    pub fn max(precision: u8) -> Self {
        Self::new(PRICE_MAX, precision)
    }

    /// Creates a new [`Price`] with the minimum representable value.
    #[must_use]
    pub fn min(precision: u8) -> Self {
        Self::new(PRICE_MIN, precision)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the value as an `f64` (lossy at extreme magnitudes).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the value as an exact `Decimal` at the display precision.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        // Scale down to the display precision to avoid noise digits
        let rescaled_raw = self.raw / 10_i64.pow(u32::from(FIXED_PRECISION - self.precision));
        Decimal::from_i128_with_scale(i128::from(rescaled_raw), u32::from(self.precision))
    }
}

impl FromStr for Price {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<f64>()
            .with_context(|| format!("Error parsing `Price` from '{s}'"))?;
        Self::new_checked(value, precision_from_str(s))
    }
}

impl From<&str> for Price {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Neg for Price {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            precision: self.precision,
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Mul for Price {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let raw = i128::from(self.raw)
            .checked_mul(i128::from(rhs.raw))
            .map(|product| product / 1_000_000_000)
            .expect("Overflow occurred when multiplying `Price`");
        Self {
            raw: i64::try_from(raw).expect("Overflow occurred when multiplying `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Div for Price {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.raw != 0, "Division by zero `Price`");
        let raw = i128::from(self.raw)
            .checked_mul(1_000_000_000)
            .map(|scaled| scaled / i128::from(rhs.raw))
            .expect("Overflow occurred when dividing `Price`");
        Self {
            raw: i64::try_from(raw).expect("Overflow occurred when dividing `Price`"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Price {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<Quantity> for Price {
    type Output = Decimal;

    fn mul(self, rhs: Quantity) -> Self::Output {
        self.as_decimal() * rhs.as_decimal()
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Price))
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;

    #[rstest]
    fn test_from_str_parses_scaled_integer() {
        let price = Price::from_str("1.2345").unwrap();
        assert_eq!(price.precision, 4);
        assert_eq!(price.raw, 1_234_500_000);
        assert_eq!(price.as_decimal(), dec!(1.2345));
    }

    #[rstest]
    #[case("0")]
    #[case("1.0")]
    #[case("100.16")]
    #[case("-0.000000001")]
    #[case("123456.789")]
    fn test_string_round_trip(#[case] s: &str) {
        let price = Price::from_str(s).unwrap();
        assert_eq!(Price::from_str(&price.to_string()).unwrap(), price);
    }

    #[rstest]
    fn test_new_invalid_precision() {
        assert!(Price::new_checked(1.0, 10).is_err());
    }

    #[rstest]
    fn test_new_non_finite() {
        assert!(Price::new_checked(f64::NAN, 2).is_err());
        assert!(Price::new_checked(f64::INFINITY, 2).is_err());
    }

    #[rstest]
    fn test_equality_across_precisions() {
        assert_eq!(Price::new(1.0, 1), Price::new(1.0, 2));
        assert!(Price::new(1.1, 1) > Price::new(1.0, 2));
        assert!(Price::new(-1.1, 1) < Price::zero(0));
    }

    #[rstest]
    fn test_arithmetic_returns_max_precision() {
        let result = Price::new(1.0, 1) + Price::new(1.011, 3);
        assert_eq!(result.precision, 3);
        assert_eq!(result, Price::new(2.011, 3));

        let result = Price::new(2.0, 1) - Price::new(0.25, 2);
        assert_eq!(result.precision, 2);
        assert_eq!(result, Price::new(1.75, 2));
    }

    #[rstest]
    fn test_mul_div() {
        assert_eq!(Price::new(2.0, 1) * Price::new(1.5, 1), Price::new(3.0, 1));
        assert_eq!(Price::new(3.0, 1) / Price::new(2.0, 1), Price::new(1.5, 1));
    }

    #[rstest]
    #[should_panic(expected = "Overflow")]
    fn test_add_overflow_panics() {
        let _ = Price::max(0) + Price::max(0);
    }

    #[rstest]
    fn test_mul_quantity_returns_decimal() {
        let notional = Price::new(1.1, 1) * Quantity::new(100.0, 0);
        assert_eq!(notional, dec!(110.0));
    }

    #[rstest]
    fn test_serde_round_trip() {
        let price = Price::new(100.16, 2);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"100.16\"");
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, price);
        assert_eq!(deserialized.precision, 2);
    }
}
