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
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use anyhow::{anyhow, Context};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sextant_core::correctness::FAILED;

use super::{
    currency::Currency,
    fixed::{f64_to_fixed_i64, fixed_i64_to_f64, FIXED_PRECISION},
};

/// The maximum valid money amount which can be represented.
pub const MONEY_MAX: f64 = 9_223_372_036.0;

/// The minimum valid money amount which can be represented.
pub const MONEY_MIN: f64 = -9_223_372_036.0;

/// Represents an amount of money in a specified currency denomination.
///
/// Cross-currency arithmetic is forbidden: adding or subtracting amounts of
/// differing currencies is an integrity failure which is fatal to the caller.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Money {
    /// The raw fixed-point amount, scaled to `FIXED_PRECISION`.
    pub raw: i64,
    /// The denomination currency.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] from the given `f64` amount, rounded
    /// half-to-even at the currency precision.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is out of range or non-finite.
    pub fn new_checked(amount: f64, currency: Currency) -> anyhow::Result<Self> {
        if !amount.is_finite() {
            anyhow::bail!("`amount` was not finite, was {amount}")
        }
        if !(MONEY_MIN..=MONEY_MAX).contains(&amount) {
            anyhow::bail!("`amount` exceeded valid range [{MONEY_MIN}, {MONEY_MAX}], was {amount}")
        }
        Ok(Self {
            raw: f64_to_fixed_i64(amount, currency.precision),
            currency,
        })
    }

    /// Creates a new [`Money`] from the given `f64` amount.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails (see [`Money::new_checked`]).
    #[must_use]
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self::new_checked(amount, currency).expect(FAILED)
    }

    /// Creates a new [`Money`] from the given raw fixed-point amount.
    #[must_use]
    pub fn from_raw(raw: i64, currency: Currency) -> Self {
        Self { raw, currency }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the amount as an `f64` (lossy at extreme magnitudes).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    /// Returns the amount as an exact `Decimal` at the currency precision.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        let precision = self.currency.precision;
        let rescaled_raw = self.raw / 10_i64.pow(u32::from(FIXED_PRECISION - precision));
        Decimal::from_i128_with_scale(i128::from(rescaled_raw), u32::from(precision))
    }
}

impl FromStr for Money {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount_str, currency_str) = s
            .rsplit_once(' ')
            .ok_or_else(|| anyhow!("Error parsing `Money` from '{s}': expected '<amount> <code>'"))?;
        let amount = amount_str
            .replace('_', "")
            .parse::<f64>()
            .with_context(|| format!("Error parsing `Money` amount from '{amount_str}'"))?;
        let currency = Currency::from_str(currency_str)?;
        Self::new_checked(amount, currency)
    }
}

impl From<&str> for Money {
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.raw == other.raw
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.currency, other.currency,
            "Cannot compare `Money` of different currencies"
        );
        self.raw.cmp(&other.raw)
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.currency.hash(state);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            currency: self.currency,
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.currency, rhs.currency,
            "Cannot add `Money` of different currencies"
        );
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Money`"),
            currency: self.currency,
        }
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.currency, rhs.currency,
            "Cannot subtract `Money` of different currencies"
        );
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Money`"),
            currency: self.currency,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({self})", stringify!(Money))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.currency.precision as usize,
            self.as_f64(),
            self.currency,
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
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
    fn test_new_rounds_to_currency_precision() {
        let money = Money::new(10.005, Currency::USD());
        assert_eq!(money.as_decimal(), dec!(10.00)); // Ties to even
    }

    #[rstest]
    fn test_from_str() {
        let money = Money::from_str("12.20 USD").unwrap();
        assert_eq!(money.currency, Currency::USD());
        assert_eq!(money.as_f64(), 12.20);
        assert_eq!(money.to_string(), "12.20 USD");
    }

    #[rstest]
    fn test_from_str_missing_code() {
        assert!(Money::from_str("12.20").is_err());
    }

    #[rstest]
    fn test_arithmetic_same_currency() {
        let a = Money::new(10.0, Currency::USD());
        let b = Money::new(2.5, Currency::USD());
        assert_eq!(a + b, Money::new(12.5, Currency::USD()));
        assert_eq!(a - b, Money::new(7.5, Currency::USD()));
        assert_eq!(-b, Money::new(-2.5, Currency::USD()));
    }

    #[rstest]
    #[should_panic(expected = "Cannot add `Money` of different currencies")]
    fn test_cross_currency_add_panics() {
        let _ = Money::new(10.0, Currency::USD()) + Money::new(1.0, Currency::AUD());
    }

    #[rstest]
    fn test_serde_round_trip() {
        let money = Money::new(-5.75, Currency::AUD());
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, money);
    }
}
